use std::fs;
use std::io::{self, BufWriter, Read, Write};

use clap::ArgMatches;
use cdseq;


pub const STREAM_ARG: &'static str = "-";


/// Opens the given path, or stdin for `-`. Gzipped files are decompressed on the fly.
pub fn resolve_reader(raw_arg: &str) -> ::Result<Box<dyn Read>>
{
    match raw_arg {
        STREAM_ARG => Ok(Box::new(io::stdin())),
        path => cdseq::open_file(path).map_err(::Error::from),
    }
}

/// Creates the given path, or returns stdout for `-`.
pub fn resolve_writer(raw_arg: &str) -> ::Result<Box<dyn Write>>
{
    match raw_arg {
        STREAM_ARG => Ok(Box::new(io::stdout())),
        path => {
            let file = fs::File::create(path)?;
            Ok(Box::new(BufWriter::new(file)))
        },
    }
}

pub fn required_value<'a>(args: &'a ArgMatches, name: &str) -> ::Result<&'a str> {
    args.value_of(name)
        .ok_or_else(|| ::Error::Cli(format!("missing value for argument '{}'", name)))
}
