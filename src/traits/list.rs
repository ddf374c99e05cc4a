//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::MingleClient;
use crate::error::Result;
use crate::pagination::{Page, PAGE_SIZE};

/// List entities with page-number pagination.
///
/// Listings are requested in ascending order of [`List::sequence_number`],
/// which is also how [`List::list_all`] detects a listing that has stopped
/// advancing.
///
/// # Example
///
/// ```ignore
/// use mingle_metrics::{Card, List, MingleClient};
///
/// let client = MingleClient::new("login", "secret", "https://mingle.example.com")?;
/// let query = "my_project".to_string();
///
/// // Fetch a single page
/// let page = Card::list_page(&client, &query, 1).await?;
///
/// // Fetch all pages
/// let all_cards = Card::list_all(&client, &query).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters identifying and filtering the listing.
    type Query: Send + Sync;

    /// Position of this entity in the sorted listing.
    fn sequence_number(&self) -> u64;

    /// List entities matching the query (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The Mingle API client
    /// * `query` - Query parameters for the listing
    /// * `page` - Page number (1-indexed)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    async fn list_page(client: &MingleClient, query: &Self::Query, page: u32)
        -> Result<Page<Self>>;

    /// List all entities matching the query (fetches all pages).
    ///
    /// Pages are requested until one comes back with fewer than
    /// [`PAGE_SIZE`] items, or until a full page fails to advance the last
    /// sequence number seen. Items are returned in the order received and
    /// are not deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails; no partial results are
    /// returned.
    async fn list_all(client: &MingleClient, query: &Self::Query) -> Result<Vec<Self>> {
        let mut all_items: Vec<Self> = Vec::new();
        let mut page = 1;
        let mut last_seen = 0;

        loop {
            let result = Self::list_page(client, query, page).await?;
            let items_count = result.items.len();
            all_items.extend(result.items);

            let last = all_items.last().map_or(0, Self::sequence_number);
            tracing::debug!(page, items_count, last, "fetched page");

            if items_count != PAGE_SIZE {
                break;
            }
            if last <= last_seen {
                tracing::warn!(
                    page,
                    last,
                    last_seen,
                    "Full page did not advance past the previous page, stopping"
                );
                break;
            }

            last_seen = last;
            page += 1;
        }

        Ok(all_items)
    }
}
