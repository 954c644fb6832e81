use std::process::ExitCode;

use clap::Parser;
use log::Level;

mod import;

use import::ImportArgs;
use tracksink_runtime::logging;

const ENV_HELP: &str = "\
Environment variables (required):
  DB_USER, DB_NAME, DB_PASSWORD, DB_HOST, DB_PORT

Logging:
  TRACKSINK_LOG_LEVEL=error|warn|info|debug|trace (default: warn)";

#[derive(Debug, Parser)]
#[command(
    name = "tracksink",
    version,
    about = "Import a streaming history JSON export into PostgreSQL",
    after_help = ENV_HELP
)]
pub struct Cli {
    #[command(flatten)]
    pub import: ImportArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.import.verbose {
        logging::init_with(Level::Info.max(logging::level_from_env())).ok();
    } else {
        logging::init().ok();
    }

    import::run(cli.import)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
