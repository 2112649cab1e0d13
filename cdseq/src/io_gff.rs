/*! Reader for the coding exons of GFF format variants.

The GFF format is a feature-oriented format that is commonly used to store gene annotation data.

An unofficial specification of the formats can be found [here](http://mblab.wustl.edu/GTF22.html)
or [here](http://www.ensembl.org/info/website/upload/gff.html).

Parsing of the rows themselves is done by the GFF reader of the
[rust-bio](https://github.com/rust-bio/rust-bio) library. This module selects the coding exon
rows and groups them per transcript.
*/
use std::collections::HashSet;
use std::io;
use std::mem;
use std::path::Path;

use bio::io::gff::{self, GffType};
use csv;
use itertools::Itertools;
use linked_hash_map::LinkedHashMap;
use multimap::MultiMap;

use {CdsAnnotation, EBuilder};
use consts::{BASIC_STR, CDS_STR, PROTEIN_CODING_STR, TAG_STR, TRANSCRIPT_BIOTYPE_STR,
             TRANSCRIPT_ID_STR, TRANSCRIPT_STR};
use model::ModelError;
use utils::{open_file, update_seq_name};


quick_error! {
    /// Errors that occur when reading GFF file variants.
    #[derive(Debug)]
    pub enum GffError {
        /// Occurs when a selected record does not have the transcript identifier attribute.
        MissingTranscriptId(attr: String, row: usize) {
            display("transcript identifier attribute '{}' not found in record {}", attr, row)
        }
        /// Occurs when more than one transcript feature shares one identifier.
        DuplicateTranscriptId(tid: String) {
            display("multiple 'transcript' features with identifier {}", tid)
        }
        /// Occurs when a record can not be turned into an exon.
        InvalidRecord(err: ModelError, row: usize) {
            display("invalid record {}: {}", row, err)
            cause(err)
        }
        /// Generic wrapper for the row parsing errors of the csv crate used by rust-bio.
        Csv(err: csv::Error) {
            display("{}", err)
            from()
            cause(err)
        }
        Io(err: io::Error) {
            display("{}", err)
            from()
            cause(err)
        }
    }
}

/// Criteria that decide which annotation rows are taken as coding exons.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationFilter {
    /// Required value of the feature column.
    pub feature: String,
    /// Required `transcript_biotype` attribute value, if any.
    pub biotype: Option<String>,
    /// Tag that must be among the `tag` attribute values, if any.
    pub tag: Option<String>,
}

impl Default for AnnotationFilter {

    fn default() -> AnnotationFilter {
        AnnotationFilter {
            feature: CDS_STR.to_owned(),
            biotype: Some(PROTEIN_CODING_STR.to_owned()),
            tag: Some(BASIC_STR.to_owned()),
        }
    }
}

impl AnnotationFilter {

    /// Filter that only checks the feature column.
    pub fn feature_only<T: Into<String>>(feature: T) -> AnnotationFilter {
        AnnotationFilter { feature: feature.into(), biotype: None, tag: None }
    }

    pub fn biotype<T: Into<String>>(mut self, biotype: Option<T>) -> Self {
        self.biotype = biotype.map(|v| v.into());
        self
    }

    pub fn tag<T: Into<String>>(mut self, tag: Option<T>) -> Self {
        self.tag = tag.map(|v| v.into());
        self
    }

    /// Whether the given record passes all criteria.
    pub fn accepts(&self, record: &gff::Record) -> bool {
        if record.feature_type() != self.feature {
            return false;
        }
        let attribs = record.attributes();
        let has_value = |key: &str, value: &str| {
            attribs.get_vec(key)
                .map(|vs| vs.iter().any(|v| v == value))
                .unwrap_or(false)
        };
        if let Some(ref biotype) = self.biotype {
            if !has_value(TRANSCRIPT_BIOTYPE_STR, biotype.as_str()) {
                return false;
            }
        }
        if let Some(ref tag) = self.tag {
            if !has_value(TAG_STR, tag.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Summary counts of an annotation file.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStats {
    /// Total number of records.
    pub num_records: usize,
    /// Number of records per feature type, in order of first appearance.
    pub feature_counts: LinkedHashMap<String, usize>,
    /// Number of transcript features per `transcript_biotype` value.
    pub transcript_biotypes: LinkedHashMap<String, usize>,
    /// Transcript identifiers seen in more than one transcript feature.
    pub duplicate_transcript_ids: Vec<String>,
}

impl AnnotationStats {

    /// Number of transcript features.
    pub fn num_transcripts(&self) -> usize {
        self.feature_counts.get(TRANSCRIPT_STR).cloned().unwrap_or(0)
    }

    /// Number of transcript features with the protein coding biotype.
    pub fn num_protein_coding(&self) -> usize {
        self.transcript_biotypes.get(PROTEIN_CODING_STR).cloned().unwrap_or(0)
    }

    /// Feature counts, largest first.
    pub fn feature_counts_desc(&self) -> Vec<(&str, usize)> {
        sorted_counts(&self.feature_counts)
    }

    /// Transcript biotype counts, largest first.
    pub fn transcript_biotypes_desc(&self) -> Vec<(&str, usize)> {
        sorted_counts(&self.transcript_biotypes)
    }

    /// Returns an error for the first transcript identifier that is not unique.
    pub fn check_unique_transcripts(&self) -> Result<(), GffError> {
        match self.duplicate_transcript_ids.first() {
            Some(tid) => Err(GffError::DuplicateTranscriptId(tid.clone())),
            None => Ok(()),
        }
    }
}

fn sorted_counts(counts: &LinkedHashMap<String, usize>) -> Vec<(&str, usize)> {
    counts.iter()
        .map(|(k, v)| (k.as_str(), *v))
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .collect()
}

/// GFF reader.
pub struct Reader<R: io::Read> {
    inner: gff::Reader<R>,
    filter: AnnotationFilter,
    transcript_id_attr: String,
    transcript_id_lstrip: Option<String>,
    seq_name_prefix: Option<String>,
    seq_name_lstrip: Option<String>,
    require_unique_transcripts: bool,
}

impl<R: io::Read> Reader<R> {

    /// Creates a GFF reader of the given variant from another reader.
    pub fn from_reader(in_reader: R, gff_type: GffType) -> Reader<R> {
        Reader {
            inner: gff::Reader::new(in_reader, gff_type),
            filter: AnnotationFilter::default(),
            transcript_id_attr: TRANSCRIPT_ID_STR.to_owned(),
            transcript_id_lstrip: None,
            seq_name_prefix: None,
            seq_name_lstrip: None,
            require_unique_transcripts: false,
        }
    }

    /// Sets the criteria for selecting coding exon records.
    pub fn filter(&mut self, filter: AnnotationFilter) -> &mut Self {
        self.filter = filter;
        self
    }

    /// Sets the reader to use the given attribute key for getting transcript identifiers.
    pub fn transcript_id_attr<T>(&mut self, transcript_id_attr: T) -> &mut Self
        where T: Into<String>
    {
        self.transcript_id_attr = transcript_id_attr.into();
        self
    }

    /// Sets the reader to trim the given string from all transcript identifiers if present at
    /// the beginning.
    pub fn transcript_id_lstrip<T>(&mut self, lstrip: Option<T>) -> &mut Self
        where T: Into<String>
    {
        self.transcript_id_lstrip = lstrip.map(|v| v.into());
        self
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

    /// Sets the reader to fail on a `transcript` feature whose identifier was already seen.
    pub fn require_unique_transcripts(&mut self, require: bool) -> &mut Self {
        self.require_unique_transcripts = require;
        self
    }

    /// Reads all records that pass the filter and groups them per transcript.
    ///
    /// Coordinates are converted from the 1-based, fully-closed file coordinates into 0-based,
    /// half-open ones.
    pub fn cds_exons(&mut self) -> ::Result<CdsAnnotation> {
        let Reader {
            ref mut inner, ref filter, ref transcript_id_attr, ref transcript_id_lstrip,
            ref seq_name_prefix, ref seq_name_lstrip, require_unique_transcripts,
        } = *self;

        let mut annotation = CdsAnnotation::new();
        let mut num_records = 0;
        let mut seen = HashSet::new();

        for (idx, result) in inner.records().enumerate() {
            let mut record = result.map_err(GffError::from)?;
            num_records += 1;
            if require_unique_transcripts && record.feature_type() == TRANSCRIPT_STR {
                if let Some(tid) = record.attributes().get(transcript_id_attr.as_str()) {
                    if !seen.insert(tid.clone()) {
                        return Err(GffError::DuplicateTranscriptId(tid.clone()).into());
                    }
                }
            }
            if !filter.accepts(&record) {
                continue;
            }
            let row = idx + 1;

            let mut tid = record.attributes().get(transcript_id_attr.as_str())
                .cloned()
                .ok_or_else(|| GffError::MissingTranscriptId(transcript_id_attr.clone(), row))?;
            update_seq_name(&mut tid, None, transcript_id_lstrip.as_ref().map(|v| v.as_str()));

            let mut seq_name = record.seqname().to_owned();
            update_seq_name(&mut seq_name, seq_name_prefix.as_ref().map(|v| v.as_str()),
                            seq_name_lstrip.as_ref().map(|v| v.as_str()));

            let mut attributes = MultiMap::new();
            for (key, values) in record.attributes().iter_all() {
                for value in values {
                    attributes.insert(key.clone(), value.clone());
                }
            }

            // rust-bio maps only '+' and '-', the builder checks the raw column.
            let strand = mem::replace(record.strand_mut(), String::new());

            let exon = EBuilder::one_based(seq_name, *record.start(), *record.end())
                .strand_str(strand)
                .transcript_id(tid)
                .attributes(attributes)
                .build()
                .map_err(|e| GffError::InvalidRecord(e, row))?;
            annotation.insert(exon);
        }

        info!("selected {} exons of {} transcripts from {} records",
              annotation.num_exons(), annotation.len(), num_records);

        Ok(annotation)
    }

    /// Gathers feature and transcript biotype counts over all records.
    pub fn stats(&mut self) -> ::Result<AnnotationStats> {
        let mut stats = AnnotationStats::default();
        let mut seen = HashSet::new();
        let mut dups = HashSet::new();

        let transcript_id_attr = self.transcript_id_attr.as_str();
        for result in self.inner.records() {
            let record = result.map_err(GffError::from)?;
            stats.num_records += 1;
            *stats.feature_counts.entry(record.feature_type().to_owned()).or_insert(0) += 1;

            if record.feature_type() != TRANSCRIPT_STR {
                continue;
            }
            let biotype = record.attributes().get(TRANSCRIPT_BIOTYPE_STR)
                .cloned()
                .unwrap_or_else(|| ".".to_owned());
            *stats.transcript_biotypes.entry(biotype).or_insert(0) += 1;

            if let Some(tid) = record.attributes().get(transcript_id_attr) {
                if !seen.insert(tid.clone()) && dups.insert(tid.clone()) {
                    stats.duplicate_transcript_ids.push(tid.clone());
                }
            }
        }

        debug!("counted {} records of {} feature types",
               stats.num_records, stats.feature_counts.len());

        Ok(stats)
    }
}

impl Reader<Box<dyn io::Read>> {

    /// Creates a GFF reader that reads from the given path, decompressing gzipped files.
    pub fn from_file<P: AsRef<Path>>(path: P, gff_type: GffType) -> io::Result<Self> {
        open_file(path).map(|file| Reader::from_reader(file, gff_type))
    }
}

#[cfg(test)]
mod test_io_gff {
    use super::*;
    use Strand;

    static MIXED_GTF: &'static str = "\
chr1\tsrc\ttranscript\t1\t30\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\"; transcript_biotype \"protein_coding\"; tag \"basic\";
chr1\tsrc\tCDS\t21\t30\t.\t+\t0\tgene_id \"G1\"; transcript_id \"T1\"; transcript_biotype \"protein_coding\"; tag \"basic\";
chr1\tsrc\tCDS\t1\t9\t.\t+\t0\tgene_id \"G1\"; transcript_id \"T1\"; transcript_biotype \"protein_coding\"; tag \"CCDS\"; tag \"basic\";
chr1\tsrc\texon\t1\t9\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\"; transcript_biotype \"protein_coding\"; tag \"basic\";
chr1\tsrc\ttranscript\t40\t60\t.\t-\t.\tgene_id \"G2\"; transcript_id \"T2\"; transcript_biotype \"lncRNA\";
chr1\tsrc\tCDS\t40\t60\t.\t-\t0\tgene_id \"G2\"; transcript_id \"T2\"; transcript_biotype \"lncRNA\"; tag \"basic\";
chr1\tsrc\ttranscript\t70\t90\t.\t-\t.\tgene_id \"G3\"; transcript_id \"T3\"; transcript_biotype \"protein_coding\";
chr1\tsrc\tCDS\t70\t90\t.\t-\t0\tgene_id \"G3\"; transcript_id \"T3\"; transcript_biotype \"protein_coding\";
chr1\tsrc\ttranscript\t70\t90\t.\t-\t.\tgene_id \"G3\"; transcript_id \"T3\"; transcript_biotype \"protein_coding\";
";

    #[test]
    fn default_filter() {
        let mut reader = Reader::from_reader(MIXED_GTF.as_bytes(), GffType::GTF2);
        let ann = reader.cds_exons().expect("annotation");
        assert_eq!(ann.len(), 1);
        assert_eq!(ann.num_exons(), 2);
        let exons = ann.exons("T1").expect("exons");
        assert_eq!(exons[0].interval(), (20, 30));
        assert_eq!(exons[1].interval(), (0, 9));
        assert_eq!(exons[1].strand(), &Strand::Forward);
        assert!(exons[1].has_attribute_value("tag", "CCDS"));
    }

    #[test]
    fn relaxed_filter() {
        let mut reader = Reader::from_reader(MIXED_GTF.as_bytes(), GffType::GTF2);
        let _ = reader.filter(AnnotationFilter::feature_only("CDS"));
        let ann = reader.cds_exons().expect("annotation");
        assert_eq!(ann.transcript_ids().collect::<Vec<_>>(), vec!["T1", "T2", "T3"]);
        assert_eq!(ann.exons("T3").unwrap()[0].strand(), &Strand::Reverse);
    }

    #[test]
    fn biotype_only_filter() {
        let mut reader = Reader::from_reader(MIXED_GTF.as_bytes(), GffType::GTF2);
        let _ = reader.filter(AnnotationFilter::default().tag(None::<String>));
        let ann = reader.cds_exons().expect("annotation");
        assert_eq!(ann.transcript_ids().collect::<Vec<_>>(), vec!["T1", "T3"]);
    }

    #[test]
    fn seq_name_rename() {
        let mut reader = Reader::from_reader(MIXED_GTF.as_bytes(), GffType::GTF2);
        let _ = reader.seq_name_lstrip(Some("chr"));
        let ann = reader.cds_exons().expect("annotation");
        assert_eq!(ann.exons("T1").unwrap()[0].seq_name(), "1");
    }

    #[test]
    fn missing_transcript_id() {
        let mut reader = Reader::from_reader(MIXED_GTF.as_bytes(), GffType::GTF2);
        let _ = reader.transcript_id_attr("Parent");
        let res = reader.cds_exons();
        assert!(matches!(res, Err(::Error::Gff(GffError::MissingTranscriptId(_, 2)))));
    }

    static BAD_STRAND_GTF: &'static str = "\
chr1\tsrc\tCDS\t1\t9\t.\t+\t0\ttranscript_id \"T1\";
chr1\tsrc\tCDS\t21\t30\t.\tw\t0\ttranscript_id \"T1\";
";

    static NO_STRAND_GTF: &'static str = "\
chr1\tsrc\tCDS\t1\t9\t.\t.\t0\ttranscript_id \"T1\";
";

    #[test]
    fn invalid_strand() {
        let mut reader = Reader::from_reader(BAD_STRAND_GTF.as_bytes(), GffType::GTF2);
        let _ = reader.filter(AnnotationFilter::feature_only("CDS"));
        let res = reader.cds_exons();
        assert!(matches!(res, Err(::Error::Gff(GffError::InvalidRecord(
            ModelError::InvalidStrand(ref v), 2))) if v == "w"));
    }

    #[test]
    fn unspecified_strand() {
        let mut reader = Reader::from_reader(NO_STRAND_GTF.as_bytes(), GffType::GTF2);
        let _ = reader.filter(AnnotationFilter::feature_only("CDS"));
        let res = reader.cds_exons();
        assert!(matches!(res, Err(::Error::Gff(GffError::InvalidRecord(
            ModelError::UnspecifiedStrand, 1)))));
    }

    #[test]
    fn unique_transcripts_required() {
        let mut reader = Reader::from_reader(MIXED_GTF.as_bytes(), GffType::GTF2);
        let _ = reader.require_unique_transcripts(true);
        let res = reader.cds_exons();
        assert!(matches!(res, Err(::Error::Gff(GffError::DuplicateTranscriptId(ref tid)))
                         if tid == "T3"));
    }

    #[test]
    fn unique_transcripts_not_required() {
        let mut reader = Reader::from_reader(MIXED_GTF.as_bytes(), GffType::GTF2);
        assert!(reader.cds_exons().is_ok());
    }

    #[test]
    fn stats_counts() {
        let mut reader = Reader::from_reader(MIXED_GTF.as_bytes(), GffType::GTF2);
        let stats = reader.stats().expect("stats");
        assert_eq!(stats.num_records, 9);
        assert_eq!(stats.feature_counts_desc(),
                   vec![("transcript", 4), ("CDS", 4), ("exon", 1)]);
        assert_eq!(stats.num_transcripts(), 4);
        assert_eq!(stats.num_protein_coding(), 3);
        assert_eq!(stats.transcript_biotypes_desc(),
                   vec![("protein_coding", 3), ("lncRNA", 1)]);
        assert_eq!(stats.duplicate_transcript_ids, vec!["T3".to_owned()]);
        assert!(matches!(stats.check_unique_transcripts(),
                         Err(GffError::DuplicateTranscriptId(ref tid)) if tid == "T3"));
    }
}
