#![deny(
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_extern_crates, unused_import_braces)]
#![warn(unused_qualifications, unused_results)]

extern crate bio;
extern crate bio_types;
extern crate csv;
extern crate flate2;
extern crate itertools;
extern crate linked_hash_map;
#[macro_use]
extern crate log;
extern crate multimap;
#[macro_use]
extern crate quick_error;
#[cfg(test)]
#[macro_use]
extern crate matches;

use std::io::Error as IoError;

pub use bio_types::strand::Strand;
pub use bio::io::gff::GffType;

mod model;
pub use model::{CdsAnnotation, CdsExon, EBuilder, ModelError};

mod io_gff;
pub use io_gff::{Reader as GffReader, AnnotationFilter, AnnotationStats, GffError};

mod io_fasta;
pub use io_fasta::{FastaError, Genome, IndexedGenome, InMemoryGenome, SeqSource};

mod io_pep;
pub use io_pep::{ProteinRecord, Proteome};

mod seq;
pub use seq::{GenomeCdsSeq, SeqError};

mod translate;
pub use translate::{translate, translate_codon, STOP_SYMBOL, UNKNOWN_SYMBOL};

mod verify;
pub use verify::{Mismatch, Outcome, TranscriptCheck, VerificationReport, Verifier};

pub use utils::open_file;


quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Model(err: ModelError) {
            display("{}", err)
            from()
            cause(err)
        }
        Gff(err: GffError) {
            display("{}", err)
            from()
            cause(err)
        }
        Fasta(err: FastaError) {
            display("{}", err)
            from()
            cause(err)
        }
        Seq(err: SeqError) {
            display("{}", err)
            from()
            cause(err)
        }
        Io(err: IoError) {
            display("{}", err)
            from()
            cause(err)
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;

// Helper type for raw coordinates
pub type Coord<T> = (T, T);

// Crate-wide constants
mod consts {
    // Various commonly-used feature column values
    pub(crate) const TRANSCRIPT_STR: &'static str = "transcript";
    pub(crate) const CDS_STR: &'static str = "CDS";

    // Commonly-used attribute keys and values.
    pub(crate) const TRANSCRIPT_ID_STR: &'static str = "transcript_id";
    pub(crate) const TRANSCRIPT_BIOTYPE_STR: &'static str = "transcript_biotype";
    pub(crate) const TAG_STR: &'static str = "tag";
    pub(crate) const PROTEIN_CODING_STR: &'static str = "protein_coding";
    pub(crate) const BASIC_STR: &'static str = "basic";
}

// Generic utilities
mod utils {
    use std::fs;
    use std::io::{self, BufReader, Read};
    use std::path::Path;

    use flate2::read::MultiGzDecoder;

    use model::ModelError;

    /// Opens the given path for reading, decompressing it on the fly when its name ends with
    /// `.gz`.
    pub fn open_file<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let reader: Box<dyn Read> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Box::new(BufReader::new(MultiGzDecoder::new(file))),
            _ => Box::new(BufReader::new(file)),
        };
        Ok(reader)
    }

    /// Converts 1-based, fully-closed coordinates into 0-based, half-open ones.
    #[inline]
    pub(crate) fn one_based_to_coord(start: u64, end: u64) -> Result<(u64, u64), ModelError> {
        if start == 0 {
            return Err(ModelError::InvalidOneBasedStart);
        }
        coord_to_interval(start - 1, end)
    }

    #[inline]
    pub(crate) fn coord_to_interval(start: u64, end: u64) -> Result<(u64, u64), ModelError> {
        if start > end {
            Err(ModelError::InvalidInterval(start, end))
        } else {
            Ok((start, end))
        }
    }

    #[inline]
    pub(crate) fn update_seq_name(
        value: &mut String,
        prefix: Option<&str>,
        lstrip: Option<&str>,
    ) {
        if let Some(lstr) = lstrip {
            if value.starts_with(lstr) {
                let _ = value.drain(..lstr.len());
            }
        }
        if let Some(pre) = prefix {
            value.insert_str(0, pre);
        }
    }

    #[cfg(test)]
    mod test_utils {
        use super::*;

        #[test]
        fn one_based_conversion() {
            assert_eq!(one_based_to_coord(1, 9).unwrap(), (0, 9));
            assert_eq!(one_based_to_coord(100, 100).unwrap(), (99, 100));
        }

        #[test]
        fn one_based_conversion_zero_start() {
            assert!(matches!(one_based_to_coord(0, 9), Err(ModelError::InvalidOneBasedStart)));
        }

        #[test]
        fn one_based_conversion_inverted() {
            assert!(matches!(one_based_to_coord(20, 10),
                             Err(ModelError::InvalidInterval(19, 10))));
        }

        #[test]
        fn seq_name_update() {
            let mut name = "22".to_owned();
            update_seq_name(&mut name, Some("chr"), None);
            assert_eq!(name, "chr22");

            let mut name = "chr22".to_owned();
            update_seq_name(&mut name, None, Some("chr"));
            assert_eq!(name, "22");

            let mut name = "22".to_owned();
            update_seq_name(&mut name, None, Some("chr"));
            assert_eq!(name, "22");
        }
    }
}
