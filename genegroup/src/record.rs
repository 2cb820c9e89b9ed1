//! Annotation records consumed by the gene assembly.
use bio_types::strand::Strand;

use crate::consts::{EXON_STR, START_CODON_STR, STOP_CODON_STR};
use crate::utils::{same_strand, strand_from_char};


/// Types of records that are relevant for assembling transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Exon,
    StartCodon,
    StopCodon,
    Other,
}

impl RecordKind {

    /// Returns the kind of a record given its feature type column value.
    pub fn from_feature_type(feature_type: &str) -> RecordKind {
        match feature_type {
            EXON_STR => RecordKind::Exon,
            START_CODON_STR => RecordKind::StartCodon,
            STOP_CODON_STR => RecordKind::StopCodon,
            _ => RecordKind::Other,
        }
    }
}

impl<'a> From<&'a str> for RecordKind {
    fn from(feature_type: &'a str) -> RecordKind {
        RecordKind::from_feature_type(feature_type)
    }
}

/// Record that can be assembled into genes.
///
/// Coordinates are 0-based and half-open, with `start() < end()`.
pub trait Record {

    /// Identifier of the gene the record is grouped into.
    fn gene_id(&self) -> &str;

    /// Identifier of the transcript the record is grouped into.
    fn transcript_id(&self) -> &str;

    fn kind(&self) -> RecordKind;

    fn strand(&self) -> Strand;

    /// Name of the sequence (e.g. chromosome) the record lies on.
    fn seq_name(&self) -> &str;

    fn start(&self) -> u64;

    fn end(&self) -> u64;

    /// The number of bases covered by the record.
    fn span(&self) -> u64 {
        self.end() - self.start()
    }
}

quick_error! {
    /// Errors that occur when building a record.
    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordError {
        InvalidInterval(start: u64, end: u64) {
            display("record interval [{}, {}) is empty or inverted", start, end)
        }
        InvalidStrandChar(strand_char: char) {
            display("invalid strand character: '{}'", strand_char)
        }
        ConflictingStrand {
            display("conflicting strand inputs specified")
        }
        UnspecifiedStrand {
            display("strand not specified")
        }
        MissingGeneId {
            display("gene identifier not specified")
        }
        MissingTranscriptId {
            display("transcript identifier not specified")
        }
    }
}

/// In-memory record.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    seq_name: String,
    start: u64,
    end: u64,
    strand: Strand,
    kind: RecordKind,
    gene_id: String,
    transcript_id: String,
}

impl Record for FeatureRecord {

    fn gene_id(&self) -> &str {
        self.gene_id.as_str()
    }

    fn transcript_id(&self) -> &str {
        self.transcript_id.as_str()
    }

    fn kind(&self) -> RecordKind {
        self.kind
    }

    fn strand(&self) -> Strand {
        self.strand
    }

    fn seq_name(&self) -> &str {
        self.seq_name.as_str()
    }

    fn start(&self) -> u64 {
        self.start
    }

    fn end(&self) -> u64 {
        self.end
    }
}

/// Builder for `FeatureRecord`.
pub struct RBuilder {
    seq_name: String,
    start: u64,
    end: u64,
    strand: Option<Strand>,
    strand_char: Option<char>,
    kind: RecordKind,
    gene_id: Option<String>,
    transcript_id: Option<String>,
}

impl RBuilder {

    pub fn new<T>(seq_name: T, start: u64, end: u64) -> Self
        where T: Into<String>
    {
        RBuilder {
            seq_name: seq_name.into(),
            start: start,
            end: end,
            strand: None,
            strand_char: None,
            kind: RecordKind::Other,
            gene_id: None,
            transcript_id: None,
        }
    }

    pub fn strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    pub fn strand_char(mut self, strand_char: char) -> Self {
        self.strand_char = Some(strand_char);
        self
    }

    pub fn kind(mut self, kind: RecordKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn feature_type(mut self, feature_type: &str) -> Self {
        self.kind = RecordKind::from_feature_type(feature_type);
        self
    }

    pub fn gene_id<T>(mut self, gene_id: T) -> Self
        where T: Into<String>
    {
        self.gene_id = Some(gene_id.into());
        self
    }

    pub fn transcript_id<T>(mut self, transcript_id: T) -> Self
        where T: Into<String>
    {
        self.transcript_id = Some(transcript_id.into());
        self
    }

    pub fn build(self) -> Result<FeatureRecord, RecordError> {
        if self.start >= self.end {
            return Err(RecordError::InvalidInterval(self.start, self.end));
        }
        let strand = resolve_strand_input(self.strand, self.strand_char)?;
        let gene_id = self.gene_id.ok_or(RecordError::MissingGeneId)?;
        let transcript_id = self.transcript_id.ok_or(RecordError::MissingTranscriptId)?;
        Ok(FeatureRecord {
            seq_name: self.seq_name,
            start: self.start,
            end: self.end,
            strand: strand,
            kind: self.kind,
            gene_id: gene_id,
            transcript_id: transcript_id,
        })
    }
}

fn resolve_strand_input(
    strand: Option<Strand>,
    strand_char: Option<char>)
-> Result<Strand, RecordError>
{
    let from_char = |sc: char| strand_from_char(sc).ok_or(RecordError::InvalidStrandChar(sc));
    match (strand, strand_char) {
        (None, None) => Err(RecordError::UnspecifiedStrand),
        (Some(sv), None) => Ok(sv),
        (None, Some(scv)) => from_char(scv),
        (Some(sv), Some(scv)) => {
            let sv_from_char = from_char(scv)?;
            if same_strand(&sv, &sv_from_char) {
                Ok(sv)
            } else {
                Err(RecordError::ConflictingStrand)
            }
        }
    }
}
