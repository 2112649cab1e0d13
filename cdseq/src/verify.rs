//! Comparison of translated coding sequences against a reference proteome.

use std::io;

use io_fasta::SeqSource;
use io_pep::Proteome;
use seq::{GenomeCdsSeq, SeqError};
use translate::translate;


/// Differences between a predicted and a reference protein sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Translated coding sequence.
    pub predicted: String,
    /// Length of the reference sequence.
    pub reference_len: usize,
    /// Differing positions as (reference, predicted, index), within the shorter sequence.
    pub diffs: Vec<(char, char, usize)>,
}

impl Mismatch {

    fn new(reference: &[u8], predicted: String) -> Mismatch {
        let diffs = reference.iter()
            .zip(predicted.bytes())
            .enumerate()
            .filter(|&(_, (&r, p))| r != p)
            .map(|(idx, (&r, p))| (r as char, p as char, idx))
            .collect();
        Mismatch {
            predicted: predicted,
            reference_len: reference.len(),
            diffs: diffs,
        }
    }

    pub fn predicted_len(&self) -> usize {
        self.predicted.len()
    }
}

/// Result of checking a single transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Match,
    Mismatch(Mismatch),
    /// The coding sequence, of the given length, can not be translated in full codons.
    NotDivisibleByThree(usize),
    /// The proteome has no record for the transcript.
    MissingReference,
    /// The coding sequence could not be assembled.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptCheck {
    pub transcript_id: String,
    pub outcome: Outcome,
}

/// Per-transcript outcomes of a verification run.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    checks: Vec<TranscriptCheck>,
}

impl VerificationReport {

    pub fn checks(&self) -> &[TranscriptCheck] {
        self.checks.as_slice()
    }

    pub fn push(&mut self, check: TranscriptCheck) {
        self.checks.push(check);
    }

    fn count<F>(&self, pred: F) -> usize
        where F: Fn(&Outcome) -> bool
    {
        self.checks.iter().filter(|c| pred(&c.outcome)).count()
    }

    pub fn num_total(&self) -> usize {
        self.checks.len()
    }

    pub fn num_matches(&self) -> usize {
        self.count(|o| *o == Outcome::Match)
    }

    pub fn num_mismatches(&self) -> usize {
        self.count(|o| match *o { Outcome::Mismatch(_) => true, _ => false })
    }

    pub fn num_div3_errors(&self) -> usize {
        self.count(|o| match *o { Outcome::NotDivisibleByThree(_) => true, _ => false })
    }

    pub fn num_missing_references(&self) -> usize {
        self.count(|o| *o == Outcome::MissingReference)
    }

    pub fn num_invalid(&self) -> usize {
        self.count(|o| match *o { Outcome::Invalid(_) => true, _ => false })
    }

    /// Writes one block per failed transcript, followed by the summary line.
    ///
    /// Mismatching transcripts are written as a `seq.mismatch: <id>` line followed by one
    /// `<reference> <predicted> <index>/<predicted length>` line per differing position. The
    /// summary line holds the number of length errors, mismatches, and transcripts.
    pub fn write_diagnostics<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for check in self.checks.iter() {
            let tid = check.transcript_id.as_str();
            match check.outcome {
                Outcome::Match => {},
                Outcome::Mismatch(ref mm) => {
                    writeln!(out, "seq.mismatch: {}", tid)?;
                    for &(r, p, idx) in mm.diffs.iter() {
                        writeln!(out, "{} {} {}/{}", r, p, idx, mm.predicted_len())?;
                    }
                    if mm.reference_len != mm.predicted_len() {
                        writeln!(out, "length {}/{}", mm.reference_len, mm.predicted_len())?;
                    }
                },
                Outcome::NotDivisibleByThree(len) => {
                    writeln!(out, "seq.div3: {} ({} nt)", tid, len)?;
                },
                Outcome::MissingReference => {
                    writeln!(out, "seq.missing: {}", tid)?;
                },
                Outcome::Invalid(ref reason) => {
                    writeln!(out, "seq.invalid: {}: {}", tid, reason)?;
                },
            }
        }
        writeln!(out, "{} {} {}", self.num_div3_errors(), self.num_mismatches(), self.num_total())
    }
}

/// Checks coding sequence translations against a reference proteome.
pub struct Verifier<'a> {
    proteome: &'a Proteome,
}

impl<'a> Verifier<'a> {

    pub fn new(proteome: &'a Proteome) -> Verifier<'a> {
        Verifier { proteome: proteome }
    }

    /// Checks one transcript.
    pub fn check<S: SeqSource>(&self, cds: &mut GenomeCdsSeq<S>, transcript_id: &str) -> Outcome {
        let reference = match self.proteome.get(transcript_id) {
            Some(rec) => rec,
            None => return Outcome::MissingReference,
        };
        let dna_seq = match cds.get_seq(transcript_id) {
            Ok(seq) => seq,
            Err(e) => return Outcome::Invalid(e.to_string()),
        };
        match translate(&dna_seq) {
            Ok(ref prot) if prot.as_bytes() == reference.seq() => Outcome::Match,
            Ok(prot) => Outcome::Mismatch(Mismatch::new(reference.seq(), prot)),
            Err(SeqError::NotDivisibleByThree(len)) => Outcome::NotDivisibleByThree(len),
            Err(e) => Outcome::Invalid(e.to_string()),
        }
    }

    /// Checks all transcripts, in annotation order.
    pub fn run<S: SeqSource>(&self, cds: &mut GenomeCdsSeq<S>) -> VerificationReport {
        let mut report = VerificationReport::default();

        for idx in 0..cds.len() {
            let tid = cds.transcript_ids()[idx].clone();
            let outcome = self.check(cds, &tid);
            match outcome {
                Outcome::Match => debug!("{}: match", tid),
                Outcome::Invalid(ref reason) => warn!("{}: {}", tid, reason),
                ref otherwise => debug!("{}: {:?}", tid, otherwise),
            }
            report.push(TranscriptCheck { transcript_id: tid, outcome: outcome });
        }

        info!("checked {} transcripts: {} matches, {} mismatches, {} length errors, \
               {} without reference, {} invalid",
              report.num_total(), report.num_matches(), report.num_mismatches(),
              report.num_div3_errors(), report.num_missing_references(), report.num_invalid());

        report
    }
}
