//! Functions invoked by the subcommands.
use std::io::{self, Read};

use clap::{App, Arg, ArgMatches};
use cdseq::{AnnotationFilter, Genome, GffReader, GffType, InMemoryGenome};

use utils::{required_value, resolve_reader, STREAM_ARG};

pub mod extract;
pub mod stats;
pub mod verify;

const TEMPLATE_SUBCMD: &'static str = "
USAGE:
    {usage}

ARGS:
{positionals}

OPTIONS:
{unified}";


/// Adds the positional annotation argument and the options for reading it.
fn annotation_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(Arg::with_name("annotation")
                .value_name("annotation")
                .help("Path to input GTF or GFF3 file or '-' for stdin")
                .takes_value(true)
                .required(true))
        .arg(Arg::with_name("gff3")
                .long("gff3")
                .help("Reads the annotation as GFF3 instead of GTF"))
        .arg(Arg::with_name("transcript_id_attr")
                .long("transcript-id-attr")
                .value_name("key")
                .help("Attribute holding the transcript identifier")
                .takes_value(true)
                .default_value("transcript_id"))
}

/// Adds the options that decide which coding exons are selected.
fn filter_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(Arg::with_name("transcript_id_lstrip")
                .long("transcript-id-lstrip")
                .value_name("prefix")
                .help("Prefix to remove from transcript identifiers")
                .takes_value(true))
        .arg(Arg::with_name("seq_name_prefix")
                .long("seq-name-prefix")
                .value_name("prefix")
                .help("Prefix to add to annotation sequence names")
                .takes_value(true))
        .arg(Arg::with_name("seq_name_lstrip")
                .long("seq-name-lstrip")
                .value_name("prefix")
                .help("Prefix to remove from annotation sequence names")
                .takes_value(true))
        .arg(Arg::with_name("no_biotype_filter")
                .long("no-biotype-filter")
                .help("Selects coding exons of all transcript biotypes"))
        .arg(Arg::with_name("no_tag_filter")
                .long("no-tag-filter")
                .help("Selects coding exons regardless of the 'basic' tag"))
}

fn annotation_reader(args: &ArgMatches) -> ::Result<GffReader<Box<dyn Read>>> {
    let gff_type = if args.is_present("gff3") { GffType::GFF3 } else { GffType::GTF2 };
    let input = resolve_reader(required_value(args, "annotation")?)?;

    let mut reader = GffReader::from_reader(input, gff_type);
    if let Some(attr) = args.value_of("transcript_id_attr") {
        let _ = reader.transcript_id_attr(attr);
    }
    Ok(reader)
}

/// Creates an annotation reader configured by both the annotation and the filter options.
///
/// The reader fails when a transcript identifier appears in more than one transcript feature.
fn filtered_annotation_reader(args: &ArgMatches) -> ::Result<GffReader<Box<dyn Read>>> {
    let mut filter = AnnotationFilter::default();
    if args.is_present("no_biotype_filter") {
        filter = filter.biotype(None::<String>);
    }
    if args.is_present("no_tag_filter") {
        filter = filter.tag(None::<String>);
    }

    let mut reader = annotation_reader(args)?;
    let _ = reader
        .filter(filter)
        .transcript_id_lstrip(args.value_of("transcript_id_lstrip"))
        .seq_name_prefix(args.value_of("seq_name_prefix"))
        .seq_name_lstrip(args.value_of("seq_name_lstrip"))
        .require_unique_transcripts(true);
    Ok(reader)
}

/// Opens the genome FASTA, reading it from stdin into memory for `-`.
fn open_genome(raw_arg: &str) -> ::Result<Genome> {
    let genome = match raw_arg {
        STREAM_ARG => InMemoryGenome::from_reader(io::stdin()).map(Genome::InMemory)?,
        path => Genome::from_file(path)?,
    };
    Ok(genome)
}
