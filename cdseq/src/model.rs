use bio_types::strand::Strand;
use linked_hash_map::LinkedHashMap;
use multimap::MultiMap;

use Coord;
use utils::{coord_to_interval, one_based_to_coord};


macro_rules! impl_common {
    ($struct_ty:ty) => (

        impl $struct_ty {

            pub fn seq_name(&self) -> &str {
                self.seq_name.as_str()
            }

            pub fn strand(&self) -> &Strand {
                &self.strand
            }

            pub fn attributes(&self) -> &MultiMap<String, String> {
                &self.attributes
            }

            pub fn start(&self) -> u64 {
                self.interval.0
            }

            pub fn end(&self) -> u64 {
                self.interval.1
            }

            #[inline]
            pub fn span(&self) -> u64 {
                self.end() - self.start()
            }
        }

    );
}

quick_error! {
    /// Errors that occur when creating annotation model values.
    #[derive(Debug)]
    pub enum ModelError {
        /// Occurs when the start coordinate is larger than the end coordinate.
        InvalidInterval(start: u64, end: u64) {
            display("interval start coordinate larger than its end coordinate: {}-{}",
                    start, end)
        }
        /// Occurs when a 1-based coordinate is zero.
        InvalidOneBasedStart {
            display("1-based start coordinate must be at least 1")
        }
        /// Occurs when a strand column value is not one of '+', '-', '.', or '?'.
        InvalidStrand(value: String) {
            display("invalid strand: '{}'", value)
        }
        ConflictingStrand {
            display("conflicting strand inputs specified")
        }
        UnspecifiedStrand {
            display("strand not specified")
        }
        MissingTranscriptId {
            display("exon has no transcript identifier")
        }
    }
}

/// A coding exon: one CDS row of an annotation file.
///
/// Coordinates are 0-based and half-open.
#[derive(Debug, Clone)]
pub struct CdsExon {
    seq_name: String,
    interval: Coord<u64>,
    strand: Strand,
    transcript_id: String,
    attributes: MultiMap<String, String>,
}

impl_common!(CdsExon);

impl CdsExon {

    pub fn transcript_id(&self) -> &str {
        self.transcript_id.as_str()
    }

    /// Returns the (start, end) coordinate pair of the exon.
    pub fn interval(&self) -> Coord<u64> {
        self.interval
    }

    /// Returns the first value of the given attribute, if present.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|v| v.as_str())
    }

    /// Whether any of the values of the given attribute is equal to `value`.
    pub fn has_attribute_value(&self, key: &str, value: &str) -> bool {
        self.attributes.get_vec(key)
            .map(|vs| vs.iter().any(|v| v == value))
            .unwrap_or(false)
    }
}

pub struct EBuilder {
    seq_name: String,
    start: u64,
    end: u64,
    one_based: bool,
    strand: Option<Strand>,
    strand_str: Option<String>,
    transcript_id: Option<String>,
    attributes: MultiMap<String, String>,
}

impl EBuilder {

    /// Starts building an exon from 0-based, half-open coordinates.
    pub fn new<T>(seq_name: T, start: u64, end: u64) -> Self
        where T: Into<String>
    {
        EBuilder {
            seq_name: seq_name.into(),
            start: start,
            end: end,
            one_based: false,
            strand: None,
            strand_str: None,
            transcript_id: None,
            attributes: MultiMap::new(),
        }
    }

    /// Starts building an exon from 1-based, fully-closed coordinates, as written in GTF and GFF3
    /// files.
    pub fn one_based<T>(seq_name: T, start: u64, end: u64) -> Self
        where T: Into<String>
    {
        let mut builder = EBuilder::new(seq_name, start, end);
        builder.one_based = true;
        builder
    }

    pub fn strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    /// Sets the strand from its annotation column value.
    pub fn strand_str<T>(mut self, strand_str: T) -> Self
        where T: Into<String>
    {
        self.strand_str = Some(strand_str.into());
        self
    }

    pub fn transcript_id<T>(mut self, transcript_id: T) -> Self
        where T: Into<String>
    {
        self.transcript_id = Some(transcript_id.into());
        self
    }

    pub fn attribute<K, V>(mut self, key: K, value: V) -> Self
        where K: Into<String>, V: Into<String>
    {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attributes(mut self, attributes: MultiMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn build(self) -> Result<CdsExon, ModelError> {
        let interval =
            if self.one_based {
                one_based_to_coord(self.start, self.end)?
            } else {
                coord_to_interval(self.start, self.end)?
            };
        let strand = resolve_strand_input(self.strand, self.strand_str)?;
        let transcript_id = self.transcript_id.ok_or(ModelError::MissingTranscriptId)?;
        Ok(CdsExon {
            seq_name: self.seq_name,
            interval: interval,
            strand: strand,
            transcript_id: transcript_id,
            attributes: self.attributes,
        })
    }
}

/// Coding exons grouped per transcript.
///
/// Transcripts are kept in the order in which their first exon was added.
#[derive(Debug, Clone, Default)]
pub struct CdsAnnotation {
    transcripts: LinkedHashMap<String, Vec<CdsExon>>,
    num_exons: usize,
}

impl CdsAnnotation {

    pub fn new() -> Self {
        CdsAnnotation::default()
    }

    /// Adds an exon under its transcript identifier.
    pub fn insert(&mut self, exon: CdsExon) {
        self.transcripts.entry(exon.transcript_id.clone())
            .or_insert_with(Vec::new)
            .push(exon);
        self.num_exons += 1;
    }

    /// Number of distinct transcripts.
    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Total number of exons across all transcripts.
    pub fn num_exons(&self) -> usize {
        self.num_exons
    }

    pub fn contains(&self, transcript_id: &str) -> bool {
        self.transcripts.contains_key(transcript_id)
    }

    /// Exons of the given transcript, in the order they were added.
    pub fn exons(&self, transcript_id: &str) -> Option<&[CdsExon]> {
        self.transcripts.get(transcript_id).map(|exons| exons.as_slice())
    }

    pub fn transcript_ids(&self) -> impl Iterator<Item=&str> {
        self.transcripts.keys().map(|k| k.as_str())
    }
}

fn strand_from_str(strand_str: &str) -> Result<Strand, ModelError> {
    match strand_str {
        "+" => Ok(Strand::Forward),
        "-" => Ok(Strand::Reverse),
        "." | "?" => Ok(Strand::Unknown),
        otherwise => Err(ModelError::InvalidStrand(otherwise.to_owned())),
    }
}

fn resolve_strand_input(
    strand: Option<Strand>,
    strand_str: Option<String>)
-> Result<Strand, ModelError>
{
    let resolved = match (strand, strand_str) {
        (None, None) => return Err(ModelError::UnspecifiedStrand),
        (Some(sv), None) => sv,
        (None, Some(ssv)) => strand_from_str(&ssv)?,
        (Some(sv), Some(ssv)) => {
            if sv != strand_from_str(&ssv)? {
                return Err(ModelError::ConflictingStrand);
            }
            sv
        }
    };
    // Coding exons need a known strand.
    if resolved == Strand::Unknown {
        return Err(ModelError::UnspecifiedStrand);
    }
    Ok(resolved)
}
