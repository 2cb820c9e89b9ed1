/*! Streaming assembly of genes, transcripts, and exons.

Annotation records sorted by gene and transcript grouping identifiers are consumed one at a
time and assembled into [`Gene`](struct.Gene.html) values, each holding its coding and
non-coding transcripts and their exons in coordinates relative to the parent feature.
*/
#![deny(
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_extern_crates, unused_import_braces)]
#![warn(unused_qualifications, unused_results)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;

use std::io::Error as IoError;

pub use bio::io::gff::GffType;
pub use bio_types::strand::Strand;

mod model;
pub use crate::model::{Exon, ModelError,
                       Transcript, CodingTranscript, NonCodingTranscript,
                       Gene};

mod record;
pub use crate::record::{Record, RecordKind, RecordError, FeatureRecord, RBuilder};

mod assembly;
pub use crate::assembly::{FeaturesError, GeneBlock, merge_exons};

mod reader;
pub use crate::reader::{GeneReader, Scanner};

mod io_gff;
pub use crate::io_gff::{Reader as GffReader, GffError, GffFeature, GffRecords};

pub use crate::utils::strand_to_char;


quick_error! {
    /// Crate-wide error type.
    #[derive(Debug)]
    pub enum Error {
        Model(err: ModelError) {
            display("{}", err)
            from()
            source(err)
        }
        Features(err: FeaturesError) {
            display("{}", err)
            from()
            source(err)
        }
        Record(err: RecordError) {
            display("{}", err)
            from()
            source(err)
        }
        Gff(err: GffError) {
            display("{}", err)
            from()
            source(err)
        }
        Io(err: IoError) {
            display("{}", err)
            from()
            source(err)
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;

// Crate-wide constants
mod consts {
    // Initial start coordinate when searching for a minimum.
    pub(crate) const INIT_START: u64 = u64::MAX;

    // Record types that take part in transcript assembly.
    pub(crate) const EXON_STR: &str = "exon";
    pub(crate) const START_CODON_STR: &str = "start_codon";
    pub(crate) const STOP_CODON_STR: &str = "stop_codon";

    // Commonly-used attribute keys.
    pub(crate) const GENE_ID_STR: &str = "gene_id";
    pub(crate) const TRANSCRIPT_ID_STR: &str = "transcript_id";

    // Value for unknown strands.
    pub(crate) const UNK_CHAR: char = '.';
}

// Generic utilities
pub(crate) mod utils {
    use bio_types::strand::Strand;

    use crate::consts::UNK_CHAR;

    #[inline]
    pub(crate) fn update_seq_name(
        value: &mut String,
        prefix: Option<&str>,
        lstrip: Option<&str>,
    ) {
        if let Some(pre) = prefix {
            value.insert_str(0, pre);
        }
        if let Some(lstr) = lstrip {
            if value.starts_with(lstr) {
                let _ = value.drain(..lstr.len());
            }
        }
    }

    /// Helper function to create a strand from its GFF column character.
    #[inline]
    pub(crate) fn strand_from_char(strand_char: char) -> Option<Strand> {
        match strand_char {
            '+' => Some(Strand::Forward),
            '-' => Some(Strand::Reverse),
            '.' | '?' => Some(Strand::Unknown),
            _ => None,
        }
    }

    /// Helper function to create a char given a strand reference.
    #[inline]
    pub fn strand_to_char(strand: &Strand) -> char {
        match *strand {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unknown => UNK_CHAR,
        }
    }

    /// Whether two strands are the same, counting two unknown strands as equal.
    #[inline]
    pub(crate) fn same_strand(one: &Strand, other: &Strand) -> bool {
        strand_to_char(one) == strand_to_char(other)
    }

}
