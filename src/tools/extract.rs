use bio::io::fasta;
use clap::{App, Arg, ArgMatches, SubCommand};
use cdseq::{translate, GenomeCdsSeq};

use tools::{filter_args, annotation_args, filtered_annotation_reader, open_genome,
            TEMPLATE_SUBCMD};
use utils::{required_value, resolve_writer};

pub const NAME: &'static str = "extract";


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    let app = SubCommand::with_name(NAME)
        .about("Writes the assembled coding sequences as FASTA")
        .template(TEMPLATE_SUBCMD);
    filter_args(annotation_args(app))
        .arg(Arg::with_name("genome")
                .value_name("genome")
                .help("Path to genome FASTA file, indexed when a '.fai' file is present")
                .takes_value(true)
                .required(true))
        .arg(Arg::with_name("output")
                .value_name("output")
                .help("Path to output FASTA file or '-' for stdout")
                .takes_value(true)
                .required(true))
        .arg(Arg::with_name("translate")
                .long("translate")
                .help("Writes protein instead of nucleotide sequences"))
}

/// Writes one record per transcript, skipping those that can not be assembled or translated.
pub fn run(args: &ArgMatches) -> ::Result<()> {
    let annotation = filtered_annotation_reader(args)?.cds_exons()?;
    let genome = open_genome(required_value(args, "genome")?)?;
    let do_translate = args.is_present("translate");

    let mut cds = GenomeCdsSeq::new(annotation, genome);
    let mut writer = fasta::Writer::new(resolve_writer(required_value(args, "output")?)?);
    let mut num_written = 0;

    for idx in 0..cds.len() {
        let tid = cds.transcript_ids()[idx].clone();
        let seq = match cds.get(idx) {
            Some(Ok(seq)) => seq,
            Some(Err(e)) => {
                warn!("skipping {}: {}", tid, e);
                continue;
            },
            None => break,
        };
        if do_translate {
            match translate(&seq) {
                Ok(prot) => writer.write(&tid, None, prot.as_bytes())?,
                Err(e) => {
                    warn!("skipping {}: {}", tid, e);
                    continue;
                },
            }
        } else {
            writer.write(&tid, None, &seq)?;
        }
        num_written += 1;
    }
    writer.flush()?;

    info!("wrote {} of {} sequences", num_written, cds.len());
    Ok(())
}
