//! Assembly of genes and transcripts from contiguous blocks of records.
use std::cmp::min;

use bio_types::strand::Strand;

use crate::consts::INIT_START;
use crate::model::{CodingTranscript, Exon, Gene, NonCodingTranscript, Transcript};
use crate::record::{Record, RecordKind};
use crate::utils::{same_strand, strand_to_char};


quick_error! {
    /// Errors that occur when a set of records can not be assembled into a gene.
    #[derive(Debug, Clone, PartialEq)]
    pub enum FeaturesError {
        /// Occurs when a record lies on a different sequence than the first record of its gene.
        InconsistentLocation {
            gid: String,
            idx: usize,
            expected: String,
            found: String,
            n_records: usize,
        } {
            display("features on varying location for gene {}: record {} of {} is on '{}', \
                     expected '{}'", gid, idx, n_records, found, expected)
        }
        /// Occurs when a record lies on a different strand than the first record of its gene.
        InconsistentOrientation {
            gid: String,
            idx: usize,
            expected: char,
            found: char,
            n_records: usize,
        } {
            display("features with varying orientation for gene {}: record {} of {} is on \
                     strand '{}', expected '{}'", gid, idx, n_records, found, expected)
        }
        /// Occurs when a coding transcript has a start codon but no stop codon.
        IncompleteCodonPair { gid: String, tid: String } {
            display("only one of start/stop codon found for {}, gene ID: {}", tid, gid)
        }
        /// Occurs when a codon record has no known strand.
        UnstrandedCodon { gid: String, tid: String } {
            display("codon without strand found for {}, gene ID: {}", tid, gid)
        }
    }
}

/// Merges touching exons into one.
///
/// Touching exons are those where one's end equals the next one's start. The exons are
/// expected to be sorted by their offsets.
pub fn merge_exons(exons: Vec<Exon>) -> Vec<Exon> {
    if exons.len() < 2 {
        return exons;
    }
    let mut merged: Vec<Exon> = Vec::with_capacity(exons.len());
    for exon in exons {
        match merged.last_mut() {
            Some(last) if last.touches(&exon) => last.extend(exon.length()),
            _ => merged.push(exon),
        }
    }
    merged
}

/// Records sharing one gene identifier, in the order they were read.
#[derive(Debug)]
pub struct GeneBlock<R> {
    gene_id: String,
    records: Vec<R>,
}

impl<R: Record> GeneBlock<R> {

    /// Starts a block from its first record.
    pub fn new(first: R) -> Self {
        GeneBlock {
            gene_id: first.gene_id().to_owned(),
            records: vec![first],
        }
    }

    pub fn gene_id(&self) -> &str {
        self.gene_id.as_str()
    }

    pub fn records(&self) -> &[R] {
        self.records.as_slice()
    }

    /// Whether the record belongs to the gene of this block.
    pub fn accepts(&self, record: &R) -> bool {
        self.gene_id == record.gene_id()
    }

    pub fn push(&mut self, record: R) {
        self.records.push(record)
    }

    /// Creates the gene and its transcripts from the block.
    ///
    /// The first record of the block decides the sequence name and strand that all other
    /// records must share. Transcripts are made from contiguous runs of records with the
    /// same transcript identifier.
    pub fn into_gene(self) -> crate::Result<Gene> {
        let GeneBlock { gene_id, records } = self;
        let n_records = records.len();
        let (seq_name, strand) = match records.first() {
            Some(first) => (first.seq_name().to_owned(), first.strand()),
            None => return Ok(Gene::new(gene_id, "", Strand::Unknown, 0)),
        };

        let mut offset = INIT_START;
        for (idx, rec) in records.iter().enumerate() {
            offset = min(offset, rec.start());
            if !same_strand(&rec.strand(), &strand) {
                return Err(FeaturesError::InconsistentOrientation {
                    gid: gene_id,
                    idx: idx,
                    expected: strand_to_char(&strand),
                    found: strand_to_char(&rec.strand()),
                    n_records: n_records,
                }.into());
            }
            if rec.seq_name() != seq_name {
                return Err(FeaturesError::InconsistentLocation {
                    gid: gene_id,
                    idx: idx,
                    expected: seq_name,
                    found: rec.seq_name().to_owned(),
                    n_records: n_records,
                }.into());
            }
        }

        let frame = GeneFrame { id: gene_id.as_str(), offset: offset, strand: strand };
        let transcripts = records
            .chunk_by(|a, b| a.transcript_id() == b.transcript_id())
            .map(|run| build_transcript(&frame, run))
            .collect::<crate::Result<Vec<Transcript>>>()?;

        debug!("assembled gene {} from {} records into {} transcript(s)",
               gene_id, n_records, transcripts.len());

        let mut gene = Gene::new(gene_id.as_str(), seq_name, strand, offset);
        gene.set_transcripts(transcripts)?;
        Ok(gene)
    }
}

/// Gene values a transcript is built against.
#[derive(Debug)]
pub(crate) struct GeneFrame<'a> {
    pub(crate) id: &'a str,
    pub(crate) offset: u64,
    pub(crate) strand: Strand,
}

/// Creates a transcript from records sharing one transcript identifier.
///
/// The transcript is coding when a start codon record is present. Its offset is relative to
/// the gene start, while its exons and coding region are relative to its own first record.
pub(crate) fn build_transcript<R: Record>(
    gene: &GeneFrame,
    records: &[R],
) -> crate::Result<Transcript>
{
    let tid = records.first().map(|rec| rec.transcript_id()).unwrap_or("");
    let local_min = records.iter()
        .map(|rec| rec.start())
        .min()
        .unwrap_or(gene.offset);
    let offset = local_min - gene.offset;
    let is_coding = records.iter().any(|rec| rec.kind() == RecordKind::StartCodon);

    let mut exons = Vec::new();
    let (mut cds_start, mut cds_end) = (None, None);
    for rec in records {
        match rec.kind() {
            RecordKind::Exon => {
                exons.push(Exon::new(rec.start() - local_min, rec.span())?);
            },
            kind @ RecordKind::StartCodon | kind @ RecordKind::StopCodon if is_coding => {
                match (kind, rec.strand()) {
                    (RecordKind::StartCodon, Strand::Forward)
                    | (RecordKind::StopCodon, Strand::Reverse) => {
                        cds_start = Some(rec.start() - local_min);
                    },
                    (RecordKind::StopCodon, Strand::Forward)
                    | (RecordKind::StartCodon, Strand::Reverse) => {
                        cds_end = Some(rec.end() - local_min);
                    },
                    _ => {
                        return Err(FeaturesError::UnstrandedCodon {
                            gid: gene.id.to_owned(),
                            tid: tid.to_owned(),
                        }.into());
                    },
                }
            },
            _ => {},
        }
    }
    let exons = merge_exons(exons);

    let transcript = if is_coding {
        match (cds_start, cds_end) {
            (Some(start), Some(end)) => {
                let mut trx = CodingTranscript::new(tid, offset, gene.strand, start, end);
                trx.set_exons(exons)?;
                Transcript::from(trx)
            },
            _ => {
                return Err(FeaturesError::IncompleteCodonPair {
                    gid: gene.id.to_owned(),
                    tid: tid.to_owned(),
                }.into());
            },
        }
    } else {
        let mut trx = NonCodingTranscript::new(tid, offset, gene.strand);
        trx.set_exons(exons)?;
        Transcript::from(trx)
    };

    trace!("built {} transcript {} of gene {} with {} exon(s)",
           if transcript.is_coding() { "coding" } else { "non-coding" },
           tid, gene.id, transcript.exons().len());

    Ok(transcript)
}

#[cfg(test)]
mod test_assembly {
    use super::*;
    use crate::record::{FeatureRecord, RBuilder};
    use crate::{Error, ModelError};

    fn rec(kind: &str, start: u64, end: u64, strand: char, tid: &str) -> FeatureRecord {
        RBuilder::new("chrX", start, end)
            .feature_type(kind)
            .strand_char(strand)
            .gene_id("A")
            .transcript_id(tid)
            .build()
            .unwrap()
    }

    fn exons(coords: &[(u64, u64)]) -> Vec<Exon> {
        coords.iter()
            .map(|&(offset, length)| Exon::new(offset, length).unwrap())
            .collect()
    }

    fn block(records: Vec<FeatureRecord>) -> GeneBlock<FeatureRecord> {
        let mut iter = records.into_iter();
        let mut blk = GeneBlock::new(iter.next().unwrap());
        for rec in iter {
            assert!(blk.accepts(&rec));
            blk.push(rec);
        }
        blk
    }

    #[test]
    fn merge_exons_touching() {
        let merged = merge_exons(exons(&[(0, 10), (10, 5)]));
        assert_eq!(merged, exons(&[(0, 15)]));
    }

    #[test]
    fn merge_exons_chain() {
        let merged = merge_exons(exons(&[(0, 10), (10, 5), (15, 5), (30, 10), (40, 2)]));
        assert_eq!(merged, exons(&[(0, 20), (30, 12)]));
    }

    #[test]
    fn merge_exons_passthrough() {
        assert!(merge_exons(Vec::new()).is_empty());
        assert_eq!(merge_exons(exons(&[(4, 2)])), exons(&[(4, 2)]));
        assert_eq!(merge_exons(exons(&[(0, 10), (40, 40)])), exons(&[(0, 10), (40, 40)]));
    }

    #[test]
    fn merge_exons_idempotent() {
        let input = exons(&[(0, 3), (3, 4), (9, 1), (10, 10), (25, 5)]);
        let once = merge_exons(input);
        let twice = merge_exons(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn transcript_forward_coding() {
        let records = vec![
            rec("exon", 10, 20, '+', "A1"),
            rec("exon", 50, 90, '+', "A1"),
            rec("stop_codon", 60, 62, '+', "A1"),
            rec("start_codon", 71, 73, '+', "A1"),
        ];
        let frame = GeneFrame { id: "A", offset: 10, strand: Strand::Forward };
        let trx = build_transcript(&frame, &records).unwrap();
        assert!(trx.is_coding());
        assert_eq!(trx.id(), "A1");
        assert_eq!(trx.offset(), 0);
        assert_eq!(trx.coding_coord(), Some((61, 52)));
        assert_eq!(trx.exons(), exons(&[(0, 10), (40, 40)]).as_slice());
    }

    #[test]
    fn transcript_reverse_coding() {
        let records = vec![
            rec("exon", 10, 100, '-', "A1"),
            rec("stop_codon", 40, 42, '-', "A1"),
            rec("start_codon", 91, 93, '-', "A1"),
        ];
        let frame = GeneFrame { id: "A", offset: 10, strand: Strand::Reverse };
        let trx = build_transcript(&frame, &records).unwrap();
        assert_eq!(trx.coding_coord(), Some((30, 83)));
        assert_eq!(trx.exons(), exons(&[(0, 90)]).as_slice());
    }

    #[test]
    fn transcript_offset_relative_to_gene() {
        let records = vec![
            rec("exon", 25, 30, '+', "A2"),
            rec("exon", 30, 45, '+', "A2"),
        ];
        let frame = GeneFrame { id: "A", offset: 9, strand: Strand::Forward };
        let trx = build_transcript(&frame, &records).unwrap();
        assert!(!trx.is_coding());
        assert_eq!(trx.offset(), 16);
        assert_eq!(trx.exons(), exons(&[(0, 20)]).as_slice());
    }

    #[test]
    fn transcript_stop_codon_only_is_noncoding() {
        let records = vec![
            rec("exon", 1, 70, '+', "F1"),
            rec("exon", 70, 90, '+', "F1"),
            rec("stop_codon", 80, 83, '+', "F1"),
        ];
        let frame = GeneFrame { id: "F", offset: 1, strand: Strand::Forward };
        let trx = build_transcript(&frame, &records).unwrap();
        assert!(!trx.is_coding());
        assert_eq!(trx.exons(), exons(&[(0, 89)]).as_slice());
    }

    #[test]
    fn transcript_incomplete_codon_pair() {
        let records = vec![
            rec("exon", 1, 70, '+', "F1"),
            rec("start_codon", 59, 62, '+', "F1"),
        ];
        let frame = GeneFrame { id: "F", offset: 1, strand: Strand::Forward };
        match build_transcript(&frame, &records) {
            Err(Error::Features(FeaturesError::IncompleteCodonPair { gid, tid })) => {
                assert_eq!(gid, "F");
                assert_eq!(tid, "F1");
            },
            otherwise => panic!("unexpected result: {:?}", otherwise),
        }
    }

    #[test]
    fn transcript_unstranded_codon() {
        let records = vec![
            rec("exon", 1, 70, '.', "F1"),
            rec("start_codon", 59, 62, '.', "F1"),
        ];
        let frame = GeneFrame { id: "F", offset: 1, strand: Strand::Unknown };
        let res = build_transcript(&frame, &records);
        assert!(matches!(res, Err(Error::Features(FeaturesError::UnstrandedCodon { .. }))));
    }

    #[test]
    fn transcript_overlapping_exons() {
        let records = vec![
            rec("exon", 1, 70, '+', "F1"),
            rec("exon", 69, 90, '+', "F1"),
        ];
        let frame = GeneFrame { id: "F", offset: 1, strand: Strand::Forward };
        let res = build_transcript(&frame, &records);
        assert!(matches!(res, Err(Error::Model(ModelError::OverlappingExons(_)))));
    }

    #[test]
    fn gene_offset_and_transcripts() {
        let blk = block(vec![
            rec("exon", 9, 20, '+', "A1"),
            rec("exon", 14, 30, '+', "A2"),
            rec("exon", 19, 45, '+', "A3"),
            rec("exon", 24, 30, '+', "A4"),
        ]);
        let gene = blk.into_gene().unwrap();
        assert_eq!(gene.id(), "A");
        assert_eq!(gene.seq_name(), "chrX");
        assert_eq!(gene.offset(), 9);
        assert_eq!(gene.end(), 45);
        let ids: Vec<&str> = gene.transcripts().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3", "A4"]);
        let offsets: Vec<u64> = gene.transcripts().iter().map(|t| t.offset()).collect();
        assert_eq!(offsets, vec![0, 5, 10, 15]);
    }

    #[test]
    fn gene_other_records_count_for_offset() {
        let blk = block(vec![
            rec("exon", 49, 90, '-', "B1"),
            rec("foo", 30, 200, '-', "B1"),
        ]);
        let gene = blk.into_gene().unwrap();
        assert_eq!(gene.offset(), 30);
        let trx = &gene.transcripts()[0];
        assert_eq!(trx.offset(), 0);
        assert_eq!(trx.exons(), exons(&[(19, 41)]).as_slice());
    }

    #[test]
    fn gene_noncontiguous_transcript_ids() {
        let blk = block(vec![
            rec("exon", 10, 20, '+', "A1"),
            rec("exon", 30, 40, '+', "A2"),
            rec("exon", 50, 60, '+', "A1"),
        ]);
        let gene = blk.into_gene().unwrap();
        let ids: Vec<&str> = gene.transcripts().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A1"]);
        assert_eq!(gene.transcripts()[2].offset(), 40);
    }

    #[test]
    fn gene_inconsistent_orientation() {
        let blk = block(vec![
            rec("exon", 29, 50, '-', "G1"),
            rec("exon", 60, 70, '-', "G1"),
            rec("exon", 79, 99, '+', "G1"),
        ]);
        match blk.into_gene() {
            Err(Error::Features(FeaturesError::InconsistentOrientation {
                gid, idx, expected, found, n_records,
            })) => {
                assert_eq!(gid, "A");
                assert_eq!(idx, 2);
                assert_eq!(expected, '-');
                assert_eq!(found, '+');
                assert_eq!(n_records, 3);
            },
            otherwise => panic!("unexpected result: {:?}", otherwise),
        }
    }

    #[test]
    fn gene_inconsistent_location() {
        let first = rec("exon", 29, 50, '-', "F1");
        let second = RBuilder::new("chrY", 79, 99)
            .feature_type("exon")
            .strand_char('-')
            .gene_id("A")
            .transcript_id("F1")
            .build()
            .unwrap();
        let blk = block(vec![first, second]);
        match blk.into_gene() {
            Err(Error::Features(FeaturesError::InconsistentLocation {
                idx, expected, found, ..
            })) => {
                assert_eq!(idx, 1);
                assert_eq!(expected, "chrX");
                assert_eq!(found, "chrY");
            },
            otherwise => panic!("unexpected result: {:?}", otherwise),
        }
    }

    #[test]
    fn gene_transcript_error_aborts() {
        let blk = block(vec![
            rec("exon", 10, 20, '+', "A1"),
            rec("exon", 10, 20, '+', "A2"),
            rec("start_codon", 12, 15, '+', "A2"),
        ]);
        let res = blk.into_gene();
        assert!(matches!(res, Err(Error::Features(FeaturesError::IncompleteCodonPair { .. }))));
    }
}
