/*! Random access to genome sequences stored in FASTA files.

A genome with a samtools-style `.fai` index next to it is read lazily through the indexed FASTA
reader of [rust-bio](https://github.com/rust-bio/rust-bio). Genomes without an index, including
gzipped ones, are loaded into memory once.
*/
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bio::io::fasta;

use utils::open_file;


quick_error! {
    /// Errors that occur when reading FASTA files.
    #[derive(Debug)]
    pub enum FastaError {
        /// Occurs when a FASTA file or its index can not be opened.
        Open(path: PathBuf, msg: String) {
            display("can not open FASTA file {}: {}", path.display(), msg)
        }
        /// Occurs when the underlying reader fails to fetch a region.
        Fetch(seq_name: String, start: u64, end: u64, msg: String) {
            display("can not fetch {}:{}-{}: {}", seq_name, start, end, msg)
        }
        /// Occurs when a requested sequence name is not present.
        UnknownSequence(seq_name: String) {
            display("sequence '{}' not found", seq_name)
        }
        /// Occurs when a requested region extends past the end of its sequence.
        OutOfRange(seq_name: String, start: u64, end: u64, len: u64) {
            display("region {}:{}-{} lies outside the sequence of length {}",
                    seq_name, start, end, len)
        }
        /// Occurs when a requested region has a larger start than end coordinate.
        InvalidRegion(seq_name: String, start: u64, end: u64) {
            display("region {}:{}-{} has a larger start than end coordinate",
                    seq_name, start, end)
        }
        /// Occurs when a protein FASTA header can not be split into its fields.
        MalformedHeader(header: String) {
            display("malformed protein header: '{}'", header)
        }
        /// Occurs when more than one protein record refers to the same transcript.
        DuplicateTranscriptId(tid: String) {
            display("multiple protein records for transcript {}", tid)
        }
        Io(err: io::Error) {
            display("{}", err)
            from()
            cause(err)
        }
    }
}

/// Source of genomic sequences addressable by sequence name and coordinates.
pub trait SeqSource {

    /// Fetches the sequence in the 0-based, half-open region `[start, end)` of `seq_name`.
    fn fetch(&mut self, seq_name: &str, start: u64, end: u64) -> ::Result<Vec<u8>>;
}

/// Genome read through a FASTA index.
pub struct IndexedGenome {
    inner: fasta::IndexedReader<fs::File>,
    seq_lens: HashMap<String, u64>,
}

impl IndexedGenome {

    /// Opens the given FASTA file together with its `.fai` index.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ::Result<Self> {
        let path = path.as_ref();
        let inner = fasta::IndexedReader::from_file(&path)
            .map_err(|e| FastaError::Open(path.to_path_buf(), e.to_string()))?;
        let seq_lens = inner.index.sequences().into_iter()
            .map(|seq| (seq.name, seq.len))
            .collect();
        Ok(IndexedGenome { inner: inner, seq_lens: seq_lens })
    }

    /// Length of the given sequence, as recorded in the index.
    pub fn seq_len(&self, seq_name: &str) -> Option<u64> {
        self.seq_lens.get(seq_name).cloned()
    }
}

impl SeqSource for IndexedGenome {

    fn fetch(&mut self, seq_name: &str, start: u64, end: u64) -> ::Result<Vec<u8>> {
        let len = self.seq_len(seq_name)
            .ok_or_else(|| FastaError::UnknownSequence(seq_name.to_owned()))?;
        if start > end {
            return Err(FastaError::InvalidRegion(seq_name.to_owned(), start, end).into());
        }
        if end > len {
            return Err(FastaError::OutOfRange(seq_name.to_owned(), start, end, len).into());
        }
        let fetch_err = |e: String| {
            ::Error::from(FastaError::Fetch(seq_name.to_owned(), start, end, e))
        };
        let mut seq = Vec::with_capacity((end - start) as usize);
        self.inner.fetch(seq_name, start, end)
            .map_err(|e| fetch_err(e.to_string()))?;
        self.inner.read(&mut seq)
            .map_err(|e| fetch_err(e.to_string()))?;
        if seq.len() as u64 != end - start {
            return Err(fetch_err(format!("read {} bases", seq.len())));
        }
        Ok(seq)
    }
}

/// Genome held completely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGenome {
    seqs: HashMap<String, Vec<u8>>,
}

impl InMemoryGenome {

    pub fn new() -> Self {
        InMemoryGenome::default()
    }

    /// Reads all records of a FASTA stream, keyed by their identifiers.
    pub fn from_reader<R: io::Read>(reader: R) -> ::Result<Self> {
        let mut genome = InMemoryGenome::new();
        for result in fasta::Reader::new(reader).records() {
            let record = result.map_err(FastaError::from)?;
            genome.insert(record.id(), record.seq().to_vec());
        }
        info!("loaded {} sequences into memory", genome.len());
        Ok(genome)
    }

    /// Reads all records of a FASTA file, decompressing gzipped files.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ::Result<Self> {
        let path = path.as_ref();
        let file = open_file(path)
            .map_err(|e| FastaError::Open(path.to_path_buf(), e.to_string()))?;
        InMemoryGenome::from_reader(file)
    }

    pub fn insert<T: Into<String>>(&mut self, seq_name: T, seq: Vec<u8>) {
        let _ = self.seqs.insert(seq_name.into(), seq);
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    /// Full sequence of the given name.
    pub fn seq(&self, seq_name: &str) -> Option<&[u8]> {
        self.seqs.get(seq_name).map(|s| s.as_slice())
    }
}

impl SeqSource for InMemoryGenome {

    fn fetch(&mut self, seq_name: &str, start: u64, end: u64) -> ::Result<Vec<u8>> {
        let seq = self.seq(seq_name)
            .ok_or_else(|| FastaError::UnknownSequence(seq_name.to_owned()))?;
        if start > end {
            return Err(FastaError::InvalidRegion(seq_name.to_owned(), start, end).into());
        }
        if end > seq.len() as u64 {
            return Err(FastaError::OutOfRange(
                seq_name.to_owned(), start, end, seq.len() as u64).into());
        }
        Ok(seq[start as usize..end as usize].to_vec())
    }
}

/// Genome FASTA, indexed when possible.
pub enum Genome {
    Indexed(IndexedGenome),
    InMemory(InMemoryGenome),
}

impl Genome {

    /// Opens the given FASTA file.
    ///
    /// The file is read through its index when a `.fai` file with the same name exists and the
    /// file is not gzipped. Otherwise all sequences are loaded into memory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ::Result<Self> {
        let path = path.as_ref();
        let is_gz = path.extension().map(|ext| ext == "gz").unwrap_or(false);
        let fai = PathBuf::from(format!("{}.fai", path.display()));
        if !is_gz && fai.exists() {
            debug!("using FASTA index {}", fai.display());
            IndexedGenome::from_file(path).map(Genome::Indexed)
        } else {
            info!("no usable index for {}, reading it into memory", path.display());
            InMemoryGenome::from_file(path).map(Genome::InMemory)
        }
    }

    pub fn is_indexed(&self) -> bool {
        match *self {
            Genome::Indexed(_) => true,
            Genome::InMemory(_) => false,
        }
    }
}

impl SeqSource for Genome {

    fn fetch(&mut self, seq_name: &str, start: u64, end: u64) -> ::Result<Vec<u8>> {
        match *self {
            Genome::Indexed(ref mut inner) => inner.fetch(seq_name, start, end),
            Genome::InMemory(ref mut inner) => inner.fetch(seq_name, start, end),
        }
    }
}

#[cfg(test)]
mod test_io_fasta {
    use super::*;

    static TWO_SEQS_FA: &'static str = ">chrA first\nACGTACGTAC\nGTAC\n>chrB\nTTTTGGGG\n";

    #[test]
    fn in_memory_from_reader() {
        let genome = InMemoryGenome::from_reader(TWO_SEQS_FA.as_bytes()).expect("genome");
        assert_eq!(genome.len(), 2);
        assert_eq!(genome.seq("chrA"), Some(&b"ACGTACGTACGTAC"[..]));
        assert_eq!(genome.seq("chrB"), Some(&b"TTTTGGGG"[..]));
        assert_eq!(genome.seq("chrC"), None);
    }

    #[test]
    fn in_memory_fetch() {
        let mut genome = InMemoryGenome::from_reader(TWO_SEQS_FA.as_bytes()).expect("genome");
        assert_eq!(genome.fetch("chrA", 8, 12).unwrap(), b"ACGT".to_vec());
        assert_eq!(genome.fetch("chrB", 0, 8).unwrap(), b"TTTTGGGG".to_vec());
        assert_eq!(genome.fetch("chrB", 3, 3).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn in_memory_fetch_errors() {
        let mut genome = InMemoryGenome::from_reader(TWO_SEQS_FA.as_bytes()).expect("genome");
        assert!(matches!(genome.fetch("chrC", 0, 1),
                         Err(::Error::Fasta(FastaError::UnknownSequence(_)))));
        assert!(matches!(genome.fetch("chrB", 4, 9),
                         Err(::Error::Fasta(FastaError::OutOfRange(_, 4, 9, 8)))));
        assert!(matches!(genome.fetch("chrB", 5, 4),
                         Err(::Error::Fasta(FastaError::InvalidRegion(_, 5, 4)))));
    }
}
