use crate::api::model::{TransactionPage, TransactionQuery};
use crate::model::{Filters, Stats, Transaction};

use super::view::EditForm;

/// Page cursor of the transaction table.
///
/// `current_page` stays within `1..=total_pages` and `total_pages` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    items_per_page: u32,
    total_pages: u32,
}

impl Pagination {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_pages: 1,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn go_to(&mut self, page: u32) -> bool {
        if page == 0 || page > self.total_pages || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn first(&mut self) {
        self.current_page = 1;
    }

    /// Returns false for a zero page size, leaving the state untouched.
    pub fn set_items_per_page(&mut self, items_per_page: u32) -> bool {
        if items_per_page == 0 {
            return false;
        }
        self.items_per_page = items_per_page;
        self.current_page = 1;
        true
    }

    /// Recompute the page count from the reported total. Returns true when
    /// the current page had to be pulled back inside the new range.
    pub fn set_total(&mut self, total: u64) -> bool {
        let pages = total.div_ceil(self.items_per_page as u64).max(1);
        self.total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
        if self.current_page > self.total_pages {
            self.current_page = self.total_pages;
            return true;
        }
        false
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

/// A fetch in flight. Its response is only applied while `seq` is the
/// latest issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: TransactionQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Fresh,
    /// Applied, but the page was out of range and has been clamped.
    PageClamped,
    /// A newer fetch was issued; the response was dropped.
    Stale,
}

/// Everything the transaction panel knows.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub center: Option<String>,
    pub filters: Filters,
    pub pagination: Pagination,
    pub transactions: Vec<Transaction>,
    pub stats: Option<Stats>,
    pub edit: Option<EditForm>,
    issued: u64,
}

impl PanelState {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            center: None,
            filters: Filters::default(),
            pagination: Pagination::new(items_per_page),
            transactions: Vec::new(),
            stats: None,
            edit: None,
            issued: 0,
        }
    }

    /// Issue a ticket for the current page and filters. `None` until the
    /// admin's center is known.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let center = self.center.clone()?;
        self.issued += 1;
        Some(FetchTicket {
            seq: self.issued,
            query: TransactionQuery {
                page: self.pagination.current_page(),
                limit: self.pagination.items_per_page(),
                center,
                filters: self.filters.clone(),
            },
        })
    }

    pub fn is_latest(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.issued
    }

    /// Apply a page response if `ticket` is still the latest one.
    pub fn apply(&mut self, ticket: &FetchTicket, page: TransactionPage) -> Applied {
        if !self.is_latest(ticket) {
            return Applied::Stale;
        }
        self.transactions = page.transactions;
        self.stats = Some(page.stats);
        if self.pagination.set_total(page.total) {
            Applied::PageClamped
        } else {
            Applied::Fresh
        }
    }

    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }
}
