use clap::{App, AppSettings, ArgMatches};

use crate::tools;

const TEMPLATE: &str = "
{bin} {version}
{about}


USAGE:
    {usage}

SUBCOMMANDS:
{subcommands}

OPTIONS:
{unified}";

const ABOUT: &str = "
genegroup assembles genes, transcripts, and exons from annotation files whose
records are sorted by their gene and transcript identifiers. Logging
verbosity is controlled by the RUST_LOG environment variable.";

/// Constructs a new `clap::App` for argument parsing.
pub fn build_cli() -> App<'static, 'static> {
    App::new("genegroup")
        .version(crate_version!())
        .author(crate_authors!())
        .about(ABOUT)
        .template(TEMPLATE)
        .max_term_width(80)
        .settings(&[AppSettings::GlobalVersion,
                    AppSettings::SubcommandRequiredElseHelp,
                    AppSettings::DisableHelpSubcommand,
                    AppSettings::VersionlessSubcommands])
        .subcommand(tools::stats::build_cli())
        .subcommand(tools::list::build_cli())
}

/// Runs the appropriate tool given the subcommand argument matches.
pub fn run(matches: ArgMatches) -> crate::Result<()> {
    match matches.subcommand() {
        (tools::stats::NAME, Some(m)) => tools::stats::run(m),
        (tools::list::NAME, Some(m)) => tools::list::run(m),
        // Subcommands are required by the app settings, so any other match is a no-op.
        _ => Ok(()),
    }
}
