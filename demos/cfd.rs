//! Fetch a project's cards and print the cumulative flow report.
//!
//! Run with:
//! ```
//! cargo run --example cfd
//! ```
//!
//! Reads credentials from `~/.mingle_metrics/config.json`; set them first
//! with `mingle-metrics config <key> <value>`.

use mingle_metrics::config::default_config_path;
use mingle_metrics::{cfd_report, get_cards_page, Card, List, MingleClient, SystemConfiguration};

#[tokio::main]
async fn main() -> mingle_metrics::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let config = SystemConfiguration::load(&default_config_path()?)?;
    let client = MingleClient::from_config(&config)?;
    println!("Connected to: {}", client.base_url());

    // Peek at the first page
    println!("\n--- First page ---");
    let page = get_cards_page(&client, &config.project_id, 1).await?;
    for card in &page {
        let status = card.status().map(|p| p.trimmed_value()).unwrap_or("-");
        println!("  #{} {} [{}] {}", card.number, card.name, card.card_type, status);
    }
    println!("More pages: {}", page.has_more);

    // Fetch everything and render the report
    println!("\n--- CFD report ---");
    let cards = Card::list_all(&client, &config.project_id).await?;
    print!("{}", cfd_report(&cards));

    Ok(())
}
