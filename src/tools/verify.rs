use std::io::Write;

use clap::{App, Arg, ArgMatches, SubCommand};
use cdseq::{GenomeCdsSeq, Proteome, Verifier};

use tools::{filter_args, annotation_args, filtered_annotation_reader, open_genome,
            TEMPLATE_SUBCMD};
use utils::{required_value, resolve_reader, resolve_writer};

pub const NAME: &'static str = "verify";


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    let app = SubCommand::with_name(NAME)
        .about("Checks translated coding sequences against a reference proteome")
        .template(TEMPLATE_SUBCMD);
    filter_args(annotation_args(app))
        .arg(Arg::with_name("genome")
                .value_name("genome")
                .help("Path to genome FASTA file, indexed when a '.fai' file is present")
                .takes_value(true)
                .required(true))
        .arg(Arg::with_name("proteome")
                .value_name("proteome")
                .help("Path to reference protein FASTA file or '-' for stdin")
                .takes_value(true)
                .required(true))
        .arg(Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("path")
                .help("Path to diagnostics output file or '-' for stdout")
                .takes_value(true)
                .default_value("-"))
}

pub fn run(args: &ArgMatches) -> ::Result<()> {
    let annotation = filtered_annotation_reader(args)?.cds_exons()?;
    let genome = open_genome(required_value(args, "genome")?)?;
    let proteome = Proteome::from_reader(resolve_reader(required_value(args, "proteome")?)?)?;

    let mut cds = GenomeCdsSeq::new(annotation, genome);
    let report = Verifier::new(&proteome).run(&mut cds);

    let mut out = resolve_writer(required_value(args, "output")?)?;
    report.write_diagnostics(&mut out)?;
    out.flush()?;
    Ok(())
}
