#![deny(
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_extern_crates, unused_import_braces)]
#![warn(unused_qualifications, unused_results)]

extern crate bio;
extern crate cdseq;
#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;

use std::io::{self, Write};
use std::process;

mod cli;
mod tools;
mod utils;


quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Cdseq(err: cdseq::Error) {
            display("{}", err)
            from()
            cause(err)
        }
        Io(err: io::Error) {
            display("{}", err)
            from()
            cause(err)
        }
        /// Occurs when the parsed arguments are not what a subcommand expects.
        Cli(msg: String) {
            display("{}", msg)
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;


fn main() {
    env_logger::init();
    let matches = cli::build_cli().get_matches();
    if let Err(err) = cli::run(matches) {
        let _ = writeln!(io::stderr(), "error: {}", err);
        process::exit(1);
    }
}
