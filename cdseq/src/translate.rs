//! Translation of coding sequences with the standard genetic code.

use seq::SeqError;


/// Symbol used for stop codons.
pub const STOP_SYMBOL: u8 = b'_';

/// Symbol used for codons containing bases other than A, C, G, and T.
pub const UNKNOWN_SYMBOL: u8 = b'X';

/// The standard genetic code, indexed by `16 * b1 + 4 * b2 + b3` where A=0, C=1, G=2, T=3.
const STANDARD_CODE: &'static [u8; 64] =
    b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV_Y_YSSSS_CWCLFLF";

#[inline]
fn base_index(base: u8) -> Option<usize> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' | b'U' | b'u' => Some(3),
        _ => None,
    }
}

/// Translates a single codon into its amino acid symbol.
///
/// Codons that are not three bases long or that contain ambiguous bases translate to
/// `UNKNOWN_SYMBOL`.
pub fn translate_codon(codon: &[u8]) -> u8 {
    if codon.len() != 3 {
        return UNKNOWN_SYMBOL;
    }
    match (base_index(codon[0]), base_index(codon[1]), base_index(codon[2])) {
        (Some(b1), Some(b2), Some(b3)) => STANDARD_CODE[b1 * 16 + b2 * 4 + b3],
        _ => UNKNOWN_SYMBOL,
    }
}

/// Translates a coding sequence into an amino acid sequence.
///
/// Stop codons are written as `_`. The sequence length must be a multiple of three.
pub fn translate(dna: &[u8]) -> Result<String, SeqError> {
    if dna.len() % 3 != 0 {
        return Err(SeqError::NotDivisibleByThree(dna.len()));
    }
    Ok(dna.chunks(3)
        .map(|codon| translate_codon(codon) as char)
        .collect())
}
