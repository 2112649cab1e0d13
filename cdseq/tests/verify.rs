extern crate cdseq;

use cdseq::{GenomeCdsSeq, GffReader, GffType, InMemoryGenome, Outcome, Proteome, Verifier};


static ANNOTATION_GTF: &'static str = include_str!("data/annotation.gtf");
static GENOME_FA: &'static str = include_str!("data/genome.fa");
static PROTEOME_FA: &'static str = include_str!("data/proteome.fa");
static PROTEOME_FA_PATH: &'static str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/proteome.fa");
static PROTEOME_FA_GZ_PATH: &'static str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/proteome.fa.gz");


fn cds_seq() -> GenomeCdsSeq<InMemoryGenome> {
    let annotation = GffReader::from_reader(ANNOTATION_GTF.as_bytes(), GffType::GTF2)
        .cds_exons()
        .expect("an annotation");
    let genome = InMemoryGenome::from_reader(GENOME_FA.as_bytes()).expect("a genome");
    GenomeCdsSeq::new(annotation, genome)
}

#[test]
fn proteome_from_reader() {
    let proteome = Proteome::from_reader(PROTEOME_FA.as_bytes()).expect("a proteome");
    assert_eq!(proteome.len(), 6);
    assert_eq!(proteome.num_skipped(), 1);
    assert_eq!(proteome.transcript_ids().collect::<Vec<_>>(),
               vec!["ENST01", "ENST02", "ENST03", "ENST04", "ENST05", "ENST07"]);
    assert!(!proteome.contains("ENST10"));

    let rec = proteome.get("ENST03").expect("a record");
    assert_eq!(rec.protein_id(), "ENSP03.1");
    assert_eq!(rec.transcript(), Some("ENST03.4"));
    assert_eq!(rec.chromosome(), Some("GRCh38:1:141:215:-1"));
    assert_eq!(rec.attribute("description"),
               Some("test protein 03 [Source:HGNC Symbol;Acc:HGNC:03]"));
    assert_eq!(rec.seq(), b"MLMAFSLASYRN");
}

#[test]
fn proteome_from_file() {
    let proteome = Proteome::from_file(PROTEOME_FA_PATH).expect("a proteome");
    assert_eq!(proteome.len(), 6);
}

#[test]
fn proteome_from_gzipped_file() {
    let proteome = Proteome::from_file(PROTEOME_FA_GZ_PATH).expect("a proteome");
    assert_eq!(proteome.len(), 6);
    assert_eq!(proteome.num_skipped(), 1);
    assert_eq!(proteome.get("ENST07").map(|r| r.seq()), Some(&b"MKLSWTDVYS"[..]));
}

#[test]
fn verify_single_transcripts() {
    let proteome = Proteome::from_reader(PROTEOME_FA.as_bytes()).expect("a proteome");
    let verifier = Verifier::new(&proteome);
    let mut cds = cds_seq();

    assert_eq!(verifier.check(&mut cds, "ENST01"), Outcome::Match);
    assert_eq!(verifier.check(&mut cds, "ENST03"), Outcome::Match);
    assert_eq!(verifier.check(&mut cds, "ENST05"), Outcome::NotDivisibleByThree(10));
    assert_eq!(verifier.check(&mut cds, "ENST06"), Outcome::MissingReference);
    match verifier.check(&mut cds, "ENST04") {
        Outcome::Invalid(reason) => assert!(reason.contains("more than one strand")),
        otherwise => panic!("unexpected outcome: {:?}", otherwise),
    }
    match verifier.check(&mut cds, "ENST07") {
        Outcome::Mismatch(mm) => {
            assert_eq!(mm.predicted, "MKLSNTDVYS");
            assert_eq!(mm.reference_len, 10);
            assert_eq!(mm.diffs, vec![('W', 'N', 4)]);
        },
        otherwise => panic!("unexpected outcome: {:?}", otherwise),
    }
}

#[test]
fn verify_report() {
    let proteome = Proteome::from_reader(PROTEOME_FA.as_bytes()).expect("a proteome");
    let mut cds = cds_seq();
    let report = Verifier::new(&proteome).run(&mut cds);

    assert_eq!(report.num_total(), 7);
    assert_eq!(report.num_matches(), 3);
    assert_eq!(report.num_mismatches(), 1);
    assert_eq!(report.num_div3_errors(), 1);
    assert_eq!(report.num_missing_references(), 1);
    assert_eq!(report.num_invalid(), 1);
    assert_eq!(report.checks().iter().map(|c| c.transcript_id.as_str()).collect::<Vec<_>>(),
               vec!["ENST01", "ENST02", "ENST03", "ENST04", "ENST05", "ENST06", "ENST07"]);

    let mut out = Vec::new();
    report.write_diagnostics(&mut out).expect("diagnostics");
    assert_eq!(String::from_utf8(out).expect("utf-8 output"), "\
seq.invalid: ENST04: exons of transcript ENST04 lie on more than one strand
seq.div3: ENST05 (10 nt)
seq.missing: ENST06
seq.mismatch: ENST07
W N 4/10
1 1 7
");
}
