//! Streaming readers of genes.
//!
//! Records are expected to be sorted so that all records of a gene are contiguous, and within
//! them, all records of a transcript are contiguous. Only one gene's records are held in
//! memory at a time.
use std::iter::{self, FromFn};

use crate::assembly::GeneBlock;
use crate::model::Gene;
use crate::record::Record;
use crate::Error;


/// Reader that groups a stream of records into genes.
///
/// A gene is emitted as soon as a record with a different gene identifier is read, or when
/// the records run out. Records with the same gene identifier that are not contiguous end up
/// in separate genes.
pub struct GeneReader<I, R> {
    records: I,
    block: Option<GeneBlock<R>>,
    fused: bool,
}

impl<I, R, E> GeneReader<I, R>
    where I: Iterator<Item=Result<R, E>>, R: Record, Error: From<E>
{

    /// Creates a gene reader over the given records.
    pub fn new<T>(records: T) -> Self
        where T: IntoIterator<IntoIter=I, Item=Result<R, E>>
    {
        GeneReader {
            records: records.into_iter(),
            block: None,
            fused: false,
        }
    }

    /// Reads the next gene.
    ///
    /// Returns `None` when there are no more records. After an error is returned, the reader
    /// stops and all subsequent calls return `None`.
    pub fn read_next(&mut self) -> Option<crate::Result<Gene>> {
        if self.fused {
            return None;
        }
        loop {
            let record = match self.records.next() {
                Some(Ok(rec)) => rec,
                Some(Err(err)) => {
                    self.stop();
                    return Some(Err(Error::from(err)));
                },
                None => {
                    self.fused = true;
                    return self.block.take().map(GeneBlock::into_gene);
                },
            };
            match self.block.take() {
                Some(mut blk) => {
                    if blk.accepts(&record) {
                        blk.push(record);
                        self.block = Some(blk);
                    } else {
                        self.block = Some(GeneBlock::new(record));
                        return Some(self.finalize(blk));
                    }
                },
                None => {
                    trace!("starting block of gene {}", record.gene_id());
                    self.block = Some(GeneBlock::new(record));
                },
            }
        }
    }

    /// Reads all remaining genes.
    ///
    /// Reading stops at the first error, which is returned without any of the genes read
    /// before it.
    pub fn read_all(&mut self) -> crate::Result<Vec<Gene>> {
        self.by_ref().collect()
    }

    /// Wraps the reader in a `Scanner`.
    pub fn scanner(self) -> Scanner<Self> {
        Scanner::new(self)
    }

    fn finalize(&mut self, block: GeneBlock<R>) -> crate::Result<Gene> {
        let gene = block.into_gene();
        if gene.is_err() {
            self.stop();
        }
        gene
    }

    fn stop(&mut self) {
        self.block = None;
        self.fused = true;
    }
}

impl<I, R, E> Iterator for GeneReader<I, R>
    where I: Iterator<Item=Result<R, E>>, R: Record, Error: From<E>
{
    type Item = crate::Result<Gene>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next()
    }
}

#[derive(Debug)]
enum ScanState {
    Scanning,
    Exhausted,
    Failed(Error),
}

/// Loop interface for reading genes.
///
/// Successive calls to `advance` step through the genes of the inner source. Scanning stops
/// for good once the source runs out or returns an error.
pub struct Scanner<I> {
    inner: I,
    gene: Option<Gene>,
    state: ScanState,
}

impl<I> Scanner<I> where I: Iterator<Item=crate::Result<Gene>> {

    pub fn new(inner: I) -> Self {
        Scanner {
            inner: inner,
            gene: None,
            state: ScanState::Scanning,
        }
    }

    /// Advances the scanner past the next gene, which is then available through `gene`.
    ///
    /// Returns `false` when scanning stops, either by reaching the end of the input or on an
    /// error. The inner source is not consulted again after that.
    pub fn advance(&mut self) -> bool {
        match self.state {
            ScanState::Scanning => {},
            _ => return false,
        }
        match self.inner.next() {
            Some(Ok(gene)) => {
                self.gene = Some(gene);
                true
            },
            Some(Err(err)) => {
                self.gene = None;
                self.state = ScanState::Failed(err);
                false
            },
            None => {
                self.gene = None;
                self.state = ScanState::Exhausted;
                false
            },
        }
    }

    /// The gene read by the most recent successful call to `advance`.
    pub fn gene(&self) -> Option<&Gene> {
        self.gene.as_ref()
    }

    pub fn take_gene(&mut self) -> Option<Gene> {
        self.gene.take()
    }

    /// The error that stopped the scanner, if any.
    ///
    /// Reaching the end of the input is not an error.
    pub fn error(&self) -> Option<&Error> {
        match self.state {
            ScanState::Failed(ref err) => Some(err),
            _ => None,
        }
    }

    /// Consumes the scanner, returning the error that stopped it, if any.
    pub fn into_error(self) -> Option<Error> {
        match self.state {
            ScanState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<F> Scanner<FromFn<F>> where F: FnMut() -> Option<crate::Result<Gene>> {

    /// Creates a scanner that reads genes from calls to `f`.
    pub fn from_fn(f: F) -> Self {
        Scanner::new(iter::from_fn(f))
    }
}
