//! GeoBridge CLI - Command-line interface
//!
//! Drives the location bridge against the simulated permission platform and
//! location SDK, printing every result envelope as a JSON line.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::locate::LocateArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "geobridge")]
#[command(version, about = "Single-shot device location over a callback channel", long_about = None)]
struct Cli {
    /// Mirror log output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request the current position once
    Locate(LocateArgs),

    /// List the capabilities required before a scan
    Capabilities,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Locate(args) => commands::locate::run(args, cli.verbose),
        Commands::Capabilities => commands::capabilities::run(),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_locate_with_global_verbose() {
        let cli = Cli::try_parse_from(["geobridge", "locate", "--silent", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Locate(_)));
    }

    #[test]
    fn test_parse_config_init_force() {
        let cli = Cli::try_parse_from(["geobridge", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Init { force: true }
            }
        ));
    }
}
