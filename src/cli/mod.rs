//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! mingle-metrics binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

const CONFIG_ABOUT: &str = "\
This application needs your user data to access your Mingle server. To do so, \
you need to set your security and instance attributes:

  Login      Your HMAC access key. 'access_key_id' in the .csv file downloaded \
from the HMAC Auth Key tab on your profile.

  Secret     Your HMAC secret key. 'secret_access_key' in the same .csv file.

  Endpoint   URL of your Mingle instance, usually of the form \
\"https://instance_name.company_name.com\".

  ProjectID  The project identifier chosen when the project was created. \
Found under Project admin -> Project Settings -> Basic information.

Without arguments the current configuration is printed.";

/// Mingle API command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "mingle-metrics",
    about = "Get your project data from Mingle",
    version
)]
pub struct Cli {
    /// Path to the configuration file [default: ~/.mingle_metrics/config.json].
    #[arg(long, global = true, env = "MINGLE_METRICS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print cumulative flow data for every card of the project as CSV.
    Cfd,

    /// Show or set configuration values.
    #[command(long_about = CONFIG_ABOUT)]
    Config {
        /// Configuration key: Login, Secret, Endpoint or ProjectID.
        key: Option<String>,

        /// New value for the key.
        value: Option<String>,
    },
}

impl Command {
    /// The key/value pair to set, when both were given.
    pub fn config_assignment(&self) -> Option<(&str, &str)> {
        match self {
            Command::Config {
                key: Some(key),
                value: Some(value),
            } => Some((key.as_str(), value.as_str())),
            _ => None,
        }
    }
}
