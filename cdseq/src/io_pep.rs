/*! Reader for reference proteome FASTA files.

Protein records are expected to carry Ensembl-style headers: the protein identifier, the
sequence type, and up to seven space-separated `key:value` attributes, the last of which may
contain spaces, for example:

```text
>ENSP00000451042.1 pep chromosome:GRCh38:14:22011:22023:1 gene:ENSG00000211923.1 transcript:ENST00000390000.1 gene_biotype:TR_D_gene transcript_biotype:TR_D_gene gene_symbol:TRDD2 description:T cell receptor delta diversity 2
```
*/
use std::collections::HashSet;
use std::io;
use std::path::Path;

use bio::io::fasta;
use linked_hash_map::LinkedHashMap;

use io_fasta::FastaError;
use utils::open_file;


/// Maximum number of space-separated fields in a protein header.
const MAX_HEADER_FIELDS: usize = 9;

/// Attribute key of the transcript identifier.
const TRANSCRIPT_KEY: &'static str = "transcript";

/// Attribute key of the chromosome location.
const CHROMOSOME_KEY: &'static str = "chromosome";

/// A reference protein sequence with its header fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinRecord {
    protein_id: String,
    protein_type: String,
    attributes: LinkedHashMap<String, String>,
    seq: Vec<u8>,
}

impl ProteinRecord {

    /// Creates a record by splitting the given full header line (without the leading `>`).
    pub fn from_header<T>(header: &str, seq: T) -> Result<Self, FastaError>
        where T: Into<Vec<u8>>
    {
        let malformed = || FastaError::MalformedHeader(header.to_owned());

        let mut fields = header.splitn(MAX_HEADER_FIELDS, ' ');
        let protein_id = fields.next()
            .filter(|v| !v.is_empty())
            .ok_or_else(&malformed)?;
        let protein_type = fields.next().ok_or_else(&malformed)?;

        let mut attributes = LinkedHashMap::new();
        for field in fields {
            let mut kv = field.splitn(2, ':');
            match (kv.next(), kv.next()) {
                (Some(key), Some(value)) => {
                    let _ = attributes.insert(key.to_owned(), value.to_owned());
                },
                _ => return Err(malformed()),
            }
        }

        Ok(ProteinRecord {
            protein_id: protein_id.to_owned(),
            protein_type: protein_type.to_owned(),
            attributes: attributes,
            seq: seq.into(),
        })
    }

    /// Creates a record from a FASTA record of rust-bio.
    pub fn from_fasta(record: &fasta::Record) -> Result<Self, FastaError> {
        let header = match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_owned(),
        };
        ProteinRecord::from_header(&header, record.seq())
    }

    pub fn protein_id(&self) -> &str {
        self.protein_id.as_str()
    }

    pub fn protein_type(&self) -> &str {
        self.protein_type.as_str()
    }

    pub fn attributes(&self) -> &LinkedHashMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|v| v.as_str())
    }

    /// Versioned transcript identifier, as written in the header.
    pub fn transcript(&self) -> Option<&str> {
        self.attribute(TRANSCRIPT_KEY)
    }

    /// Transcript identifier without its version suffix.
    pub fn transcript_id(&self) -> Option<&str> {
        self.transcript().and_then(|v| v.split('.').next())
    }

    pub fn chromosome(&self) -> Option<&str> {
        self.attribute(CHROMOSOME_KEY)
    }

    /// Amino acid sequence.
    pub fn seq(&self) -> &[u8] {
        self.seq.as_slice()
    }
}

/// Reference protein records keyed by unversioned transcript identifier.
#[derive(Debug, Clone, Default)]
pub struct Proteome {
    records: LinkedHashMap<String, ProteinRecord>,
    num_skipped: usize,
}

impl Proteome {

    /// Indexes the given records by their transcript identifiers.
    ///
    /// Records without a transcript or a chromosome attribute are skipped. The transcript
    /// identifiers of all other records must be unique, regardless of their versions.
    pub fn from_records<I>(records: I) -> Result<Self, FastaError>
        where I: IntoIterator<Item=ProteinRecord>
    {
        let mut proteome = Proteome::default();
        let mut seen = HashSet::new();

        for record in records {
            let tid = match record.transcript_id() {
                Some(tid) => tid.to_owned(),
                None => {
                    proteome.num_skipped += 1;
                    continue;
                },
            };
            if !seen.insert(tid.clone()) {
                return Err(FastaError::DuplicateTranscriptId(tid));
            }
            if record.chromosome().is_none() {
                proteome.num_skipped += 1;
                continue;
            }
            let _ = proteome.records.insert(tid, record);
        }

        Ok(proteome)
    }

    /// Reads and indexes all records of a protein FASTA stream.
    pub fn from_reader<R: io::Read>(reader: R) -> ::Result<Self> {
        let mut records = Vec::new();
        for result in fasta::Reader::new(reader).records() {
            let record = result.map_err(FastaError::from)?;
            records.push(ProteinRecord::from_fasta(&record)?);
        }
        let proteome = Proteome::from_records(records)?;
        info!("indexed {} protein records, skipped {}", proteome.len(), proteome.num_skipped());
        Ok(proteome)
    }

    /// Reads and indexes all records of a protein FASTA file, decompressing gzipped files.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ::Result<Self> {
        let path = path.as_ref();
        let file = open_file(path)
            .map_err(|e| FastaError::Open(path.to_path_buf(), e.to_string()))?;
        Proteome::from_reader(file)
    }

    pub fn get(&self, transcript_id: &str) -> Option<&ProteinRecord> {
        self.records.get(transcript_id)
    }

    pub fn contains(&self, transcript_id: &str) -> bool {
        self.records.contains_key(transcript_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records left out of the index.
    pub fn num_skipped(&self) -> usize {
        self.num_skipped
    }

    pub fn transcript_ids(&self) -> impl Iterator<Item=&str> {
        self.records.keys().map(|k| k.as_str())
    }
}
