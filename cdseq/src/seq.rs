//! Assembly of coding sequences from annotated exons and a genome.

use bio::alphabets::dna;
use itertools::Itertools;

use {CdsAnnotation, CdsExon, Strand};
use io_fasta::SeqSource;


quick_error! {
    /// Errors that occur when assembling or translating coding sequences.
    #[derive(Debug)]
    pub enum SeqError {
        /// Occurs when a transcript identifier is not present in the annotation.
        UnknownTranscript(tid: String) {
            display("transcript {} not found in the annotation", tid)
        }
        /// Occurs when the exons of one transcript lie on different strands.
        MixedStrand(tid: String) {
            display("exons of transcript {} lie on more than one strand", tid)
        }
        /// Occurs when a coding sequence length is not a multiple of three.
        NotDivisibleByThree(len: usize) {
            display("sequence length {} is not divisible by three", len)
        }
    }
}

/// Coding sequences of the annotated transcripts of a genome.
///
/// Transcripts are addressable by identifier and by their position in the annotation.
pub struct GenomeCdsSeq<S> {
    annotation: CdsAnnotation,
    source: S,
    transcripts: Vec<String>,
}

impl<S: SeqSource> GenomeCdsSeq<S> {

    pub fn new(annotation: CdsAnnotation, source: S) -> Self {
        let transcripts = annotation.transcript_ids().map(|tid| tid.to_owned()).collect();
        GenomeCdsSeq {
            annotation: annotation,
            source: source,
            transcripts: transcripts,
        }
    }

    /// Number of distinct transcripts.
    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Transcript identifiers in the order used by `get`.
    pub fn transcript_ids(&self) -> &[String] {
        self.transcripts.as_slice()
    }

    pub fn annotation(&self) -> &CdsAnnotation {
        &self.annotation
    }

    pub fn into_inner(self) -> (CdsAnnotation, S) {
        (self.annotation, self.source)
    }

    /// Returns the exons of a transcript sorted by start coordinate, together with their
    /// common strand.
    pub fn get_cds_exons(&self, transcript_id: &str) -> Result<(Vec<&CdsExon>, Strand), SeqError> {
        sorted_exons(&self.annotation, transcript_id)
    }

    /// Assembles the coding sequence of a transcript.
    ///
    /// Exon sequences are concatenated in genomic order. For transcripts on the reverse strand,
    /// the concatenation as a whole is reverse-complemented.
    pub fn get_seq(&mut self, transcript_id: &str) -> ::Result<Vec<u8>> {
        let (exons, strand) = sorted_exons(&self.annotation, transcript_id)?;

        let mut seq = Vec::with_capacity(exons.iter().map(|e| e.span() as usize).sum());
        for exon in exons.iter() {
            let exon_seq = self.source.fetch(exon.seq_name(), exon.start(), exon.end())?;
            seq.extend_from_slice(&exon_seq);
        }

        if strand == Strand::Reverse {
            seq = dna::revcomp(seq.as_slice());
        }
        Ok(seq)
    }

    /// Assembles the coding sequence of the transcript at the given position.
    pub fn get(&mut self, idx: usize) -> Option<::Result<Vec<u8>>> {
        let tid = match self.transcripts.get(idx) {
            Some(tid) => tid.clone(),
            None => return None,
        };
        Some(self.get_seq(&tid))
    }
}

fn sorted_exons<'a>(
    annotation: &'a CdsAnnotation,
    transcript_id: &str,
) -> Result<(Vec<&'a CdsExon>, Strand), SeqError>
{
    let exons = annotation.exons(transcript_id)
        .ok_or_else(|| SeqError::UnknownTranscript(transcript_id.to_owned()))?;

    if !exons.iter().map(|e| e.strand()).all_equal() {
        return Err(SeqError::MixedStrand(transcript_id.to_owned()));
    }
    let strand = exons.first()
        .map(|e| *e.strand())
        .ok_or_else(|| SeqError::UnknownTranscript(transcript_id.to_owned()))?;

    let sorted = exons.iter()
        .sorted_by_key(|e| e.start())
        .collect();
    Ok((sorted, strand))
}
