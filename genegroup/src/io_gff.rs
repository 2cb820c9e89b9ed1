/*! Record source for GFF format variants.

The GFF format is a feature-oriented format that is commonly used to store gene annotation data.

An unofficial specification of the formats can be found [here](http://mblab.wustl.edu/GTF22.html)
or [here](http://www.ensembl.org/info/website/upload/gff.html).

Entries are expected to be sorted by their gene and transcript grouping attributes, as in the
example below:

```text
Y	.	exon	10	20	0	-	.	gene_id "A"; transcript_id "A1";
Y	.	exon	50	90	0	-	.	gene_id "A"; transcript_id "A1";
Y	.	stop_codon	60	62	0	-	.	gene_id "A"; transcript_id "A1";
Y	.	start_codon	71	73	0	-	.	gene_id "A"; transcript_id "A1";
Y	.	exon	10	100	0	-	.	gene_id "A"; transcript_id "A2";
```

The parsing of the rows themselves is done by the [rust-bio](https://github.com/rust-bio/rust-bio)
GFF reader.
*/
use std::convert::AsRef;
use std::fs;
use std::io;
use std::path::Path;

use bio::io::gff::{self, GffType};
use bio_types::strand::Strand;
use csv::Error as CsvError;

use crate::consts::{GENE_ID_STR, TRANSCRIPT_ID_STR};
use crate::model::Gene;
use crate::reader::GeneReader;
use crate::record::{Record, RecordKind};
use crate::utils::update_seq_name;


quick_error! {
    /// Errors that occur when reading GFF file variants.
    #[derive(Debug)]
    pub enum GffError {
        /// Occurs when a record does not have the gene grouping attribute, or has it empty.
        MissingGeneId(attr: String) {
            display("empty grouping {} field", attr)
        }
        /// Occurs when a record does not have the transcript grouping attribute, or has it
        /// empty.
        MissingTranscriptId(attr: String) {
            display("empty grouping {} field", attr)
        }
        /// Occurs when a record has a zero start or a start larger than its end.
        InvalidInterval(start: u64, end: u64) {
            display("invalid record interval: {}-{}", start, end)
        }
        /// Occurs when a grouping attribute is changed after records have been read.
        TagAfterRead {
            display("grouping attributes can not be changed after the first read")
        }
        /// Generic wrapper for errors from parsing the rows.
        Csv(err: CsvError) {
            display("{}", err)
            from()
            source(err)
        }
    }
}

/// GFF reader.
pub struct Reader<R: io::Read> {
    inner: gff::Reader<R>,
    gene_id_attr: String,
    transcript_id_attr: String,
    seq_name_prefix: Option<String>,
    seq_name_lstrip: Option<String>,
    after_read: bool,
}

impl<R: io::Read> Reader<R> {

    /// Creates a GFF reader of the given variant from another reader.
    pub fn from_reader(in_reader: R, gff_type: GffType) -> Reader<R> {
        Reader {
            inner: gff::Reader::new(in_reader, gff_type),
            gene_id_attr: GENE_ID_STR.to_owned(),
            transcript_id_attr: TRANSCRIPT_ID_STR.to_owned(),
            seq_name_prefix: None,
            seq_name_lstrip: None,
            after_read: false,
        }
    }

    /// Sets the reader to use the given attribute key for getting gene identifiers.
    ///
    /// This can only be done before the first read.
    pub fn gene_id_attr<T>(&mut self, gene_id_attr: T) -> Result<&mut Self, GffError>
        where T: Into<String>
    {
        self.check_not_read()?;
        self.gene_id_attr = gene_id_attr.into();
        Ok(self)
    }

    /// Sets the reader to use the given attribute key for getting transcript identifiers.
    ///
    /// This can only be done before the first read.
    pub fn transcript_id_attr<T>(&mut self, transcript_id_attr: T) -> Result<&mut Self, GffError>
        where T: Into<String>
    {
        self.check_not_read()?;
        self.transcript_id_attr = transcript_id_attr.into();
        Ok(self)
    }

    /// Sets the reader to add the given prefix to all sequence names.
    pub fn seq_name_prefix<T>(&mut self, prefix: Option<T>) -> &mut Self
        where T: Into<String>
    {
        self.seq_name_prefix = prefix.map(|v| v.into());
        self
    }

    /// Sets the reader to trim the given string from all sequence names if present at the
    /// beginning.
    pub fn seq_name_lstrip<T>(&mut self, lstrip: Option<T>) -> &mut Self
        where T: Into<String>
    {
        self.seq_name_lstrip = lstrip.map(|v| v.into());
        self
    }

    /// Creates an iterator of records with their grouping identifiers resolved.
    pub fn records(&mut self) -> GffRecords<'_, R> {
        self.after_read = true;
        GffRecords {
            inner: self.inner.records(),
            gene_id_attr: self.gene_id_attr.as_str(),
            transcript_id_attr: self.transcript_id_attr.as_str(),
            seq_name_prefix: self.seq_name_prefix.as_deref(),
            seq_name_lstrip: self.seq_name_lstrip.as_deref(),
        }
    }

    /// Creates a streaming reader of genes.
    pub fn genes(&mut self) -> GeneReader<GffRecords<'_, R>, GffFeature> {
        GeneReader::new(self.records())
    }

    /// Reads all remaining genes.
    pub fn read_all(&mut self) -> crate::Result<Vec<Gene>> {
        self.genes().read_all()
    }

    fn check_not_read(&self) -> Result<(), GffError> {
        if self.after_read {
            Err(GffError::TagAfterRead)
        } else {
            Ok(())
        }
    }
}

impl Reader<fs::File> {

    /// Creates a GFF reader that reads from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P, gff_type: GffType) -> crate::Result<Self> {
        fs::File::open(path)
            .map_err(crate::Error::from)
            .map(|file| Reader::from_reader(file, gff_type))
    }
}

/// Iterator over GFF records.
pub struct GffRecords<'a, R: 'a> where R: io::Read {
    inner: gff::Records<'a, R>,
    gene_id_attr: &'a str,
    transcript_id_attr: &'a str,
    seq_name_prefix: Option<&'a str>,
    seq_name_lstrip: Option<&'a str>,
}

impl<'a, R> Iterator for GffRecords<'a, R> where R: io::Read {

    type Item = Result<GffFeature, GffError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
            .map(|row| {
                row
                    .map_err(GffError::from)
                    .and_then(|rec| GffFeature::try_from_record(
                        rec, self.gene_id_attr, self.transcript_id_attr,
                        self.seq_name_prefix, self.seq_name_lstrip))
            })
    }
}

/// Annotation record read from a GFF file.
///
/// Coordinates are converted to 0-based, half-open.
#[derive(Debug, Clone, PartialEq)]
pub struct GffFeature {
    seq_name: String,
    feature_type: String,
    start: u64,
    end: u64,
    strand: Strand,
    gene_id: String,
    transcript_id: String,
}

impl GffFeature {

    /// Creates a `GffFeature` from the given GFF record and grouping attribute keys.
    fn try_from_record(
        record: gff::Record,
        gene_id_attr: &str,
        transcript_id_attr: &str,
        seq_name_prefix: Option<&str>,
        seq_name_lstrip: Option<&str>,
    ) -> Result<Self, GffError> {

        let gene_id = record.attributes().get(gene_id_attr)
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| GffError::MissingGeneId(gene_id_attr.to_owned()))?;

        let transcript_id = record.attributes().get(transcript_id_attr)
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| GffError::MissingTranscriptId(transcript_id_attr.to_owned()))?;

        let (start, end) = (*record.start(), *record.end());
        if start == 0 || start > end {
            return Err(GffError::InvalidInterval(start, end));
        }

        let mut seq_name = record.seqname().to_owned();
        update_seq_name(&mut seq_name, seq_name_prefix, seq_name_lstrip);

        Ok(GffFeature {
            seq_name: seq_name,
            feature_type: record.feature_type().to_owned(),
            start: start - 1,
            end: end,
            strand: record.strand().unwrap_or(Strand::Unknown),
            gene_id: gene_id,
            transcript_id: transcript_id,
        })
    }

    /// Value of the feature type column.
    pub fn feature_type(&self) -> &str {
        self.feature_type.as_str()
    }
}

impl Record for GffFeature {

    fn gene_id(&self) -> &str {
        self.gene_id.as_str()
    }

    fn transcript_id(&self) -> &str {
        self.transcript_id.as_str()
    }

    fn kind(&self) -> RecordKind {
        RecordKind::from_feature_type(&self.feature_type)
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
