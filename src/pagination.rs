//! Pagination utilities for Mingle API responses.
//!
//! The cards endpoint reports neither a total nor next-page links, so a
//! full page is the only hint that another page may follow.

use serde::Serialize;

/// Number of cards Mingle returns per page.
pub const PAGE_SIZE: usize = 25;

/// A page of results from the Mingle API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Expected number of items per page.
    pub count: usize,
    /// Whether the page was full, meaning another page may exist.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, count: usize) -> Self {
        let has_more = items.len() == count;
        Self {
            items,
            page,
            count,
            has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Query parameters for one page of a sorted listing.
///
/// Field order is the serialized parameter order.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationParams<'a> {
    /// Page number (1-indexed).
    pub page: u32,
    /// Attribute to sort by.
    pub sort: &'a str,
    /// Sort direction ("ASC" or "DESC").
    pub order: &'a str,
}
