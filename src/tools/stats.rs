use std::io::Write;

use clap::{App, ArgMatches, SubCommand};
use genegroup::Gene;

use crate::tools::{input_args, open_reader, TEMPLATE_SUBCMD};
use crate::utils::resolve_writer;

pub const NAME: &str = "stats";


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name(NAME)
        .about("Counts genes, transcripts, and exons")
        .template(TEMPLATE_SUBCMD)
        .args(&input_args())
}

#[derive(Debug, Default, PartialEq)]
struct Counts {
    genes: usize,
    coding: usize,
    noncoding: usize,
    exons: usize,
}

impl Counts {

    fn add(&mut self, gene: &Gene) {
        self.genes += 1;
        for trx in gene.transcripts() {
            if trx.is_coding() {
                self.coding += 1;
            } else {
                self.noncoding += 1;
            }
            self.exons += trx.exons().len();
        }
    }

    fn transcripts(&self) -> usize {
        self.coding + self.noncoding
    }
}

pub fn run(args: &ArgMatches) -> crate::Result<()> {
    let mut reader = open_reader(args)?;
    let mut scanner = reader.genes().scanner();
    let mut counts = Counts::default();
    while scanner.advance() {
        if let Some(gene) = scanner.gene() {
            counts.add(gene);
        }
    }
    if let Some(err) = scanner.into_error() {
        return Err(err.into());
    }
    info!("read {} gene(s) with {} transcript(s)", counts.genes, counts.transcripts());

    let mut out = resolve_writer("-")?;
    writeln!(out, "genes\t{}", counts.genes)?;
    writeln!(out, "transcripts\t{}", counts.transcripts())?;
    writeln!(out, "coding_transcripts\t{}", counts.coding)?;
    writeln!(out, "noncoding_transcripts\t{}", counts.noncoding)?;
    writeln!(out, "exons\t{}", counts.exons)?;
    out.flush()?;
    Ok(())
}
