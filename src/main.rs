//! Switchboard CLI binary entry point.

use clap::Parser;
use switchboard::cli::{Cli, Commands, ConfigArgs};
use switchboard::config::SwitchboardConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => switchboard::cli::serve::run(&args.host, args.port, &args.dir).await,
        Commands::Config(args) => print_config(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_config(args: ConfigArgs) -> switchboard::error::Result<()> {
    let config = match args.file {
        Some(path) => SwitchboardConfig::load(path)?.with_env(),
        None => SwitchboardConfig::resolve()?,
    };
    print!("{}", config.to_toml_string()?);
    Ok(())
}
