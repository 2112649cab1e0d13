use std::io::Write;

use clap::{App, Arg, ArgMatches, SubCommand};

use tools::{annotation_args, annotation_reader, TEMPLATE_SUBCMD};
use utils::{required_value, resolve_writer};

pub const NAME: &'static str = "stats";


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    let app = SubCommand::with_name(NAME)
        .about("Gathers feature and transcript biotype counts")
        .template(TEMPLATE_SUBCMD);
    annotation_args(app)
        .arg(Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("path")
                .help("Path to output file or '-' for stdout")
                .takes_value(true)
                .default_value("-"))
}

/// Writes the counts and fails when a transcript identifier is used more than once.
pub fn run(args: &ArgMatches) -> ::Result<()> {
    let stats = annotation_reader(args)?.stats()?;

    let mut out = resolve_writer(required_value(args, "output")?)?;
    writeln!(out, "records\t{}", stats.num_records)?;
    writeln!(out, "transcripts\t{}", stats.num_transcripts())?;
    writeln!(out, "protein_coding_transcripts\t{}", stats.num_protein_coding())?;
    for (feature, count) in stats.feature_counts_desc() {
        writeln!(out, "feature\t{}\t{}", feature, count)?;
    }
    for (biotype, count) in stats.transcript_biotypes_desc() {
        writeln!(out, "transcript_biotype\t{}\t{}", biotype, count)?;
    }
    out.flush()?;

    stats.check_unique_transcripts().map_err(|e| ::Error::from(::cdseq::Error::from(e)))
}
