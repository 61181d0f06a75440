//! Client-side search and paging over already-fetched lists

use crate::models::{CurrentAccount, InventoryItem, KoliItem, OrderReceipt};

/// Rows revealed per page
pub const PAGE_SIZE: usize = 20;

/// Rows that can be matched against a free-text query
pub trait Searchable {
    /// Case-insensitive substring match; `query` is already lowercased
    fn matches(&self, query: &str) -> bool;
}

fn contains(field: &str, query: &str) -> bool {
    field.to_lowercase().contains(query)
}

impl Searchable for InventoryItem {
    fn matches(&self, query: &str) -> bool {
        contains(&self.inventory_name, query) || contains(&self.inventory_code, query)
    }
}

impl Searchable for KoliItem {
    fn matches(&self, query: &str) -> bool {
        contains(&self.package_no, query) || contains(&self.explanation, query)
    }
}

impl Searchable for OrderReceipt {
    fn matches(&self, query: &str) -> bool {
        contains(&self.receipt_no, query)
            || contains(&self.current_account_name, query)
            || self.rec_id.to_string().contains(query)
    }
}

impl Searchable for CurrentAccount {
    fn matches(&self, query: &str) -> bool {
        contains(&self.current_account_code, query) || contains(&self.current_account_name, query)
    }
}

/// Items matching `query`; a blank query keeps everything
pub fn filter_items<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.matches(&query))
        .cloned()
        .collect()
}

/// "Load more" paging: page `n` shows the first `n * PAGE_SIZE` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Paginator already advanced to `page` (1-based, clamped to at least 1)
    pub fn at_page(page: usize) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.page.saturating_mul(self.page_size).min(items.len());
        &items[..end]
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.page.saturating_mul(self.page_size) < total
    }

    /// Advance one page if more rows remain. Returns whether it advanced.
    pub fn load_more(&mut self, total: usize) -> bool {
        if self.has_more(total) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}
