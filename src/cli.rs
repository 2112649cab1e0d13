use clap::{App, AppSettings, ArgMatches};

use tools::{extract, stats, verify};

const TEMPLATE: &'static str = "
{bin} {version}
{about}


USAGE:
    {usage}

SUBCOMMANDS:
{subcommands}

OPTIONS:
{unified}";

const ABOUT: &'static str = "
cdstools is a collection of tools for assembling the coding sequences of
annotated transcripts and checking their translations against a reference
proteome.";

/// Constructs a new `clap::App` for argument parsing.
pub fn build_cli() -> App<'static, 'static> {
    App::new("cdstools")
        .version(crate_version!())
        .author(crate_authors!())
        .about(ABOUT)
        .template(TEMPLATE)
        .max_term_width(80)
        .settings(&[AppSettings::GlobalVersion,
                    AppSettings::SubcommandRequiredElseHelp,
                    AppSettings::DisableHelpSubcommand,
                    AppSettings::VersionlessSubcommands])
        .subcommand(verify::build_cli())
        .subcommand(stats::build_cli())
        .subcommand(extract::build_cli())
}

/// Runs the appropriate tool given the subcommand argument matches.
pub fn run(matches: ArgMatches) -> ::Result<()> {
    match matches.subcommand() {
        (verify::NAME, Some(m)) => verify::run(m),
        (stats::NAME, Some(m)) => stats::run(m),
        (extract::NAME, Some(m)) => extract::run(m),
        // We should not reach this point since we already require
        // that subcommands must be present in the app settings.
        _ => Err(::Error::Cli("unexpected subcommand parsing error".to_owned())),
    }
}
