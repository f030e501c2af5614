//! Offset pagination
//!
//! The Daktela API pages every collection with `skip`/`take` parameters and
//! reports the matching row count in its envelope. The pager turns that into
//! a continuation decision after each page; the fetcher that drives it never
//! holds more than the page in flight.

use std::collections::HashMap;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these query parameters
    Continue {
        /// Query parameters for the next request
        query_params: HashMap<String, String>,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination progress during one table's extraction.
///
/// Only the current offset and running totals live here; records never do.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    /// Current offset into the result set
    pub offset: u64,
    /// Total records fetched so far
    pub fetched: u64,
    /// Pages fetched so far
    pub pages: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PageState {
    /// Create a fresh state at offset zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

/// Offset/limit pager (`?skip=1000&take=1000`)
#[derive(Debug, Clone)]
pub struct OffsetPager {
    /// Query parameter name for the offset
    pub skip_param: String,
    /// Query parameter name for the page size
    pub take_param: String,
    /// Records per page
    pub page_size: u32,
}

impl OffsetPager {
    /// Create a pager with the Daktela parameter names
    pub fn new(page_size: u32) -> Self {
        Self {
            skip_param: "skip".to_string(),
            take_param: "take".to_string(),
            page_size,
        }
    }

    /// Query parameters addressing the page at the current offset
    pub fn params(&self, state: &PageState) -> Vec<(String, String)> {
        vec![
            (self.skip_param.clone(), state.offset.to_string()),
            (self.take_param.clone(), self.page_size.to_string()),
        ]
    }

    /// Record one fetched page and decide whether another follows.
    ///
    /// Stops on an empty page, a short page, or once the total the API
    /// reported has been fetched.
    pub fn advance(
        &self,
        state: &mut PageState,
        records_count: usize,
        total: Option<u64>,
    ) -> NextPage {
        state.fetched += records_count as u64;
        state.pages += 1;

        if records_count == 0 || records_count < self.page_size as usize {
            state.mark_done();
            return NextPage::Done;
        }

        if let Some(total) = total {
            if state.fetched >= total {
                state.mark_done();
                return NextPage::Done;
            }
        }

        state.offset += u64::from(self.page_size);
        NextPage::Continue {
            query_params: self.params(state).into_iter().collect(),
        }
    }
}
