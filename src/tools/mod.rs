//! Functions invoked by the subcommands.
use std::io::Read;

use clap::{Arg, ArgMatches};
use genegroup::{GffReader, GffType};

use crate::utils::resolve_reader;

pub mod list;
pub mod stats;

const TEMPLATE_SUBCMD: &str = "
USAGE:
    {usage}

ARGS:
{positionals}

OPTIONS:
{unified}";

const FORMATS: &[&str] = &["gtf", "gff2", "gff3"];


/// Arguments for reading genes, shared by all subcommands.
pub fn input_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name("input")
            .value_name("input")
            .help("Path to input annotation file or '-' for stdin")
            .takes_value(true)
            .required(true),
        Arg::with_name("format")
            .long("format")
            .value_name("format")
            .help("Format of the input annotation file")
            .takes_value(true)
            .possible_values(FORMATS)
            .default_value("gtf"),
        Arg::with_name("gene-tag")
            .long("gene-tag")
            .value_name("tag")
            .help("Attribute key of gene identifiers")
            .takes_value(true)
            .default_value("gene_id"),
        Arg::with_name("transcript-tag")
            .long("transcript-tag")
            .value_name("tag")
            .help("Attribute key of transcript identifiers")
            .takes_value(true)
            .default_value("transcript_id"),
        Arg::with_name("prefix")
            .long("prefix")
            .value_name("str")
            .help("String to add to the start of sequence names")
            .takes_value(true),
        Arg::with_name("lstrip")
            .long("lstrip")
            .value_name("str")
            .help("String to remove from the start of sequence names")
            .takes_value(true),
    ]
}

/// Opens the annotation reader configured by the shared arguments.
pub fn open_reader(args: &ArgMatches) -> crate::Result<GffReader<Box<dyn Read>>> {
    let gff_type = match args.value_of("format") {
        Some("gff3") => GffType::GFF3,
        Some("gff2") => GffType::GFF2,
        _ => GffType::GTF2,
    };
    let input = args.value_of("input").unwrap_or("-");
    let mut reader = GffReader::from_reader(resolve_reader(input)?, gff_type);

    if let Some(tag) = args.value_of("gene-tag") {
        let _ = reader.gene_id_attr(tag)?;
    }
    if let Some(tag) = args.value_of("transcript-tag") {
        let _ = reader.transcript_id_attr(tag)?;
    }
    let _ = reader
        .seq_name_prefix(args.value_of("prefix"))
        .seq_name_lstrip(args.value_of("lstrip"));

    debug!("reading {} as {}", input, args.value_of("format").unwrap_or("gtf"));
    Ok(reader)
}
