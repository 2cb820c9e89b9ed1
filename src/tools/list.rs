use std::io::Write;

use clap::{App, Arg, ArgMatches, SubCommand};
use genegroup::{strand_to_char, Gene, Transcript};
use itertools::Itertools;

use crate::tools::{input_args, open_reader, TEMPLATE_SUBCMD};
use crate::utils::resolve_writer;

pub const NAME: &str = "list";

const NONE_STR: &str = ".";


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name(NAME)
        .about("Lists transcripts with the coordinates of their gene")
        .template(TEMPLATE_SUBCMD)
        .args(&input_args())
        .arg(Arg::with_name("output")
                .value_name("output")
                .help("Path to output file or '-' for stdout")
                .takes_value(true)
                .default_value("-"))
}

/// Formats a transcript and its gene as one tab-separated line.
fn transcript_line(gene: &Gene, trx: &Transcript) -> String {
    let (cds_start, cds_end) = match trx.coding_coord() {
        Some((start, end)) => (start.to_string(), end.to_string()),
        None => (NONE_STR.to_owned(), NONE_STR.to_owned()),
    };
    vec![
        gene.id().to_owned(),
        gene.seq_name().to_owned(),
        strand_to_char(gene.strand()).to_string(),
        gene.start().to_string(),
        gene.end().to_string(),
        trx.id().to_owned(),
        if trx.is_coding() { "coding" } else { "noncoding" }.to_owned(),
        trx.offset().to_string(),
        trx.exons().len().to_string(),
        cds_start,
        cds_end,
    ].iter().join("\t")
}

pub fn run(args: &ArgMatches) -> crate::Result<()> {
    let mut reader = open_reader(args)?;
    let mut out = resolve_writer(args.value_of("output").unwrap_or("-"))?;

    let mut n_genes = 0;
    for gene in reader.genes() {
        let gene = gene?;
        for trx in gene.transcripts() {
            writeln!(out, "{}", transcript_line(&gene, trx))?;
        }
        n_genes += 1;
    }
    out.flush()?;

    info!("listed transcripts of {} gene(s)", n_genes);
    Ok(())
}
