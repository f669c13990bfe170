//! Record queries for queuelens
//!
//! The dashboard never owns its records. Everything it shows about ratings,
//! matches, queue items and API calls comes through [`DashboardStore`], which
//! callers pass in explicitly.

mod error;
mod memory;

use chrono::NaiveDateTime;

pub use error::StoreError;
pub use memory::{Fixture, MemoryStore};

// Re-export types that are used in our public API
pub use queuelens_types::{
    ApiCall, ApiCallSummary, MatchRecord, Query, QueryPage, QueueItem, QueueStatus, QueueTab,
    RatedItem,
};

/// Number of queue items per tab, for tab badges
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct QueueCounts {
    pub pending: usize,
    pub history: usize,
    pub failed: usize,
}

impl QueueCounts {
    pub fn get(&self, tab: QueueTab) -> usize {
        match tab {
            QueueTab::Pending => self.pending,
            QueueTab::History => self.history,
            QueueTab::Failed => self.failed,
        }
    }
}

/// Query interface over the records behind the dashboard.
///
/// Every listing returns one page of items, newest first, plus the total
/// number of items matching the query's filter.
pub trait DashboardStore {
    fn rated_items(&self, query: &Query) -> Result<QueryPage<RatedItem>, StoreError>;

    fn match_history(&self, query: &Query) -> Result<QueryPage<MatchRecord>, StoreError>;

    fn queue_items(&self, tab: QueueTab, query: &Query)
    -> Result<QueryPage<QueueItem>, StoreError>;

    fn queue_counts(&self) -> Result<QueueCounts, StoreError>;

    fn api_calls(&self, query: &Query) -> Result<QueryPage<ApiCall>, StoreError>;

    /// Summary over calls made at or after `since` (all calls when `None`)
    fn api_call_summary(
        &self,
        since: Option<NaiveDateTime>,
    ) -> Result<ApiCallSummary, StoreError>;
}
