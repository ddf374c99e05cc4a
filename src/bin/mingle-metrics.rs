//! Mingle metrics CLI binary.
//!
//! Fetches every card of the configured project and prints cumulative flow
//! data, or manages the stored connection settings.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use mingle_metrics::cli::{Cli, Command};
use mingle_metrics::config::{self, ConfigKey, SystemConfiguration};
use mingle_metrics::{cfd_report, get_cards, MingleClient, PrettyPrint};
use tracing::Level;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> mingle_metrics::Result<()> {
    let path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    match cli.command {
        Command::Cfd => handle_cfd(&path).await,
        command @ Command::Config { .. } => handle_config(&path, command.config_assignment()),
    }
}

async fn handle_cfd(path: &Path) -> mingle_metrics::Result<()> {
    let config = SystemConfiguration::load(path)?;
    let client = MingleClient::from_config(&config)?;

    let cards = get_cards(&client, &config.project_id).await?;
    tracing::info!(cards = cards.len(), "fetched all cards");

    // The report already ends with a newline
    print!("{}", cfd_report(&cards));
    Ok(())
}

fn handle_config(path: &Path, assignment: Option<(&str, &str)>) -> mingle_metrics::Result<()> {
    let current = match assignment {
        None => SystemConfiguration::load(path)?,
        Some((key, value)) => match config::set(path, key, value)? {
            Some(saved) => {
                println!("Saving to config file at {}", path.display());
                saved
            }
            None => {
                print_unknown_key(key);
                SystemConfiguration::load(path)?
            }
        },
    };

    println!("{}", current.pretty_print());
    Ok(())
}

fn print_unknown_key(key: &str) {
    let valid: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
    println!("Unknown configuration key '{key}'");
    println!("Valid keys: {}", valid.join(", "));
}
