//! Gene, transcript, and exon models.
//!
//! Coordinates of the models are nested: a gene carries its absolute start position on the
//! sequence, a transcript carries its offset from the gene start, and exons and coding region
//! boundaries are relative to the start of their transcript.
use std::cmp::max;

use bio_types::strand::Strand;

use crate::utils::same_strand;


quick_error! {
    /// Errors raised when a model rejects its contents.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ModelError {
        /// Occurs when an exon covers no bases.
        EmptyExon(offset: u64) {
            display("exon at offset {} has zero length", offset)
        }
        /// Occurs when exons of the same transcript overlap each other.
        OverlappingExons(tid: String) {
            display("exons overlap, transcript ID: {}", tid)
        }
        /// Occurs when a transcript is attached to a gene on another strand.
        MismatchedStrand { gid: String, tid: String } {
            display("transcript strand differs from gene strand, gene ID: {}, transcript ID: {}",
                    gid, tid)
        }
    }
}

/// Contiguous transcribed interval, relative to the start of its transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exon {
    offset: u64,
    length: u64,
}

impl Exon {

    pub fn new(offset: u64, length: u64) -> Result<Exon, ModelError> {
        if length == 0 {
            return Err(ModelError::EmptyExon(offset));
        }
        Ok(Exon { offset: offset, length: length })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// End coordinate of the exon, exclusive.
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }

    /// Whether this exon ends exactly where the other one starts.
    pub fn touches(&self, other: &Exon) -> bool {
        self.end() == other.offset
    }

    pub fn overlaps(&self, other: &Exon) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }

    pub(crate) fn extend(&mut self, length: u64) {
        self.length += length
    }
}

macro_rules! impl_common {
    ($struct_ty:ty) => (

        impl $struct_ty {

            pub fn id(&self) -> &str {
                self.id.as_str()
            }

            /// Start of the transcript relative to the start of its gene.
            pub fn offset(&self) -> u64 {
                self.offset
            }

            pub fn strand(&self) -> &Strand {
                &self.strand
            }

            pub fn exons(&self) -> &[Exon] {
                self.exons.as_slice()
            }

            pub fn take_exons(self) -> Vec<Exon> {
                self.exons
            }

            /// Sets the exons of the transcript.
            ///
            /// The exons are stored sorted by their offsets. Overlapping exons are rejected
            /// and leave the transcript untouched.
            pub fn set_exons(&mut self, mut exons: Vec<Exon>) -> Result<(), ModelError> {
                exons.sort_by_key(Exon::offset);
                if exons.windows(2).any(|pair| pair[0].overlaps(&pair[1])) {
                    return Err(ModelError::OverlappingExons(self.id.clone()));
                }
                self.exons = exons;
                Ok(())
            }

            /// End of the last exon, relative to the start of the transcript.
            #[inline]
            pub fn end(&self) -> u64 {
                self.exons.iter().fold(0, |acc, exn| max(acc, exn.end()))
            }

            /// Number of bases between the transcript start and its last exon end.
            #[inline]
            pub fn span(&self) -> u64 {
                self.end()
            }
        }

    );
}

/// Transcript whose records include a start codon.
#[derive(Debug, Clone, PartialEq)]
pub struct CodingTranscript {
    id: String,
    offset: u64,
    strand: Strand,
    exons: Vec<Exon>,
    cds_start: u64,
    cds_end: u64,
}

impl_common!(CodingTranscript);

impl CodingTranscript {

    pub fn new<T>(id: T, offset: u64, strand: Strand, cds_start: u64, cds_end: u64) -> Self
        where T: Into<String>
    {
        CodingTranscript {
            id: id.into(),
            offset: offset,
            strand: strand,
            exons: Vec::new(),
            cds_start: cds_start,
            cds_end: cds_end,
        }
    }

    pub fn cds_start(&self) -> u64 {
        self.cds_start
    }

    pub fn cds_end(&self) -> u64 {
        self.cds_end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NonCodingTranscript {
    id: String,
    offset: u64,
    strand: Strand,
    exons: Vec<Exon>,
}

impl_common!(NonCodingTranscript);

impl NonCodingTranscript {

    pub fn new<T>(id: T, offset: u64, strand: Strand) -> Self
        where T: Into<String>
    {
        NonCodingTranscript {
            id: id.into(),
            offset: offset,
            strand: strand,
            exons: Vec::new(),
        }
    }
}

/// A coding or non-coding transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Transcript {
    Coding(CodingTranscript),
    NonCoding(NonCodingTranscript),
}

// Forwards a call to whichever transcript variant is present.
macro_rules! on_variant {
    ($trx:expr, $inner:ident => $call:expr) => (
        match $trx {
            Transcript::Coding($inner) => $call,
            Transcript::NonCoding($inner) => $call,
        }
    );
}

impl Transcript {

    pub fn id(&self) -> &str {
        on_variant!(self, t => t.id())
    }

    pub fn offset(&self) -> u64 {
        on_variant!(self, t => t.offset())
    }

    pub fn strand(&self) -> &Strand {
        on_variant!(self, t => t.strand())
    }

    pub fn exons(&self) -> &[Exon] {
        on_variant!(self, t => t.exons())
    }

    pub fn end(&self) -> u64 {
        on_variant!(self, t => t.end())
    }

    pub fn span(&self) -> u64 {
        on_variant!(self, t => t.span())
    }

    pub fn is_coding(&self) -> bool {
        match self {
            Transcript::Coding(_) => true,
            Transcript::NonCoding(_) => false,
        }
    }

    /// Coding region boundaries, relative to the start of the transcript.
    pub fn coding_coord(&self) -> Option<(u64, u64)> {
        match self {
            Transcript::Coding(t) => Some((t.cds_start(), t.cds_end())),
            Transcript::NonCoding(_) => None,
        }
    }
}

impl From<CodingTranscript> for Transcript {
    fn from(transcript: CodingTranscript) -> Transcript {
        Transcript::Coding(transcript)
    }
}

impl From<NonCodingTranscript> for Transcript {
    fn from(transcript: NonCodingTranscript) -> Transcript {
        Transcript::NonCoding(transcript)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    id: String,
    seq_name: String,
    strand: Strand,
    offset: u64,
    transcripts: Vec<Transcript>,
}

impl Gene {

    pub fn new<T, S>(id: T, seq_name: S, strand: Strand, offset: u64) -> Self
        where T: Into<String>, S: Into<String>
    {
        Gene {
            id: id.into(),
            seq_name: seq_name.into(),
            strand: strand,
            offset: offset,
            transcripts: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn seq_name(&self) -> &str {
        self.seq_name.as_str()
    }

    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Absolute start coordinate of the gene on its sequence.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn start(&self) -> u64 {
        self.offset
    }

    /// Absolute end coordinate of the gene, taken from the furthest exon end.
    pub fn end(&self) -> u64 {
        self.offset + self.transcripts.iter()
            .fold(0, |acc, trx| max(acc, trx.offset() + trx.end()))
    }

    #[inline]
    pub fn span(&self) -> u64 {
        self.end() - self.start()
    }

    pub fn transcripts(&self) -> &[Transcript] {
        self.transcripts.as_slice()
    }

    pub fn take_transcripts(self) -> Vec<Transcript> {
        self.transcripts
    }

    /// Sets the transcripts of the gene, in the given order.
    ///
    /// All transcripts must lie on the strand of the gene. Genes assembled from records always
    /// pass this check, since their transcripts take the gene strand; it only guards genes
    /// built by hand.
    pub fn set_transcripts(&mut self, transcripts: Vec<Transcript>) -> Result<(), ModelError> {
        if let Some(trx) = transcripts.iter().find(|t| !same_strand(t.strand(), &self.strand)) {
            return Err(ModelError::MismatchedStrand {
                gid: self.id.clone(),
                tid: trx.id().to_owned(),
            });
        }
        self.transcripts = transcripts;
        Ok(())
    }
}
