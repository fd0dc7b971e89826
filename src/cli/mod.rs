//! CLI entry point for the switchboard tools.

pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Switchboard developer CLI
#[derive(Parser, Debug)]
#[command(name = "switchboard", version, about = "Switchboard developer tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve static files with cross-origin isolation headers
    Serve(ServeArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

/// Arguments for `switchboard serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Directory to serve
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}

/// Arguments for `switchboard config`.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// TOML file to layer the environment over (defaults to the per-user file)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults_match_dev_server() {
        let cli = Cli::parse_from(["switchboard", "serve"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.port, 8000);
                assert_eq!(args.dir, PathBuf::from("."));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_accepts_file() {
        let cli = Cli::parse_from(["switchboard", "config", "--file", "board.toml"]);
        match cli.command {
            Commands::Config(args) => assert_eq!(args.file, Some(PathBuf::from("board.toml"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
