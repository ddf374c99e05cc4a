//! Mingle API client library.
//!
//! Fetches every card of a Mingle project through the paginated v2 API and
//! renders cumulative flow data as semicolon separated text.
//!
//! # Quick Start
//!
//! ```no_run
//! use mingle_metrics::{cfd_report, get_cards, MingleClient, SystemConfiguration};
//!
//! #[tokio::main]
//! async fn main() -> mingle_metrics::Result<()> {
//!     let path = mingle_metrics::config::default_config_path()?;
//!     let config = SystemConfiguration::load(&path)?;
//!
//!     // Create client from the stored HMAC key pair
//!     let client = MingleClient::from_config(&config)?;
//!
//!     // Fetch every card, page by page
//!     let cards = get_cards(&client, &config.project_id).await?;
//!     println!("Found {} cards", cards.len());
//!
//!     print!("{}", cfd_report(&cards));
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! Connection settings live in `~/.mingle_metrics/config.json`:
//!
//! - `Login` - HMAC access key id
//! - `Secret` - HMAC secret access key
//! - `Endpoint` - URL of the Mingle instance
//! - `ProjectID` - project identifier

pub mod auth;
pub mod cli;
mod client;
pub mod config;
mod error;
mod models;
mod output;
mod pagination;
mod report;
mod traits;

// Re-export core types
pub use client::MingleClient;
pub use config::{ConfigKey, SystemConfiguration};
pub use error::{MingleError, Result};
pub use pagination::{Page, PaginationParams, PAGE_SIZE};

// Re-export traits
pub use output::PrettyPrint;
pub use traits::List;

// Re-export models
pub use models::{Card, Property, MOVED_TO_PREFIX, STATUS_PROPERTY};

// Re-export convenience functions
pub use models::{get_cards, get_cards_page};
pub use report::{cfd_report, CFD_HEADER};
