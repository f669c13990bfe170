use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use crate::{DashboardStore, QueueCounts, StoreError};
use queuelens_types::{
    ApiCall, ApiCallSummary, MatchRecord, Query, QueryPage, QueueItem, QueueTab, RatedItem,
};

/// Records a [`MemoryStore`] starts from, as loaded from a JSON file
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub rated_items: Vec<RatedItem>,
    pub matches: Vec<MatchRecord>,
    pub queue: Vec<QueueItem>,
    pub api_calls: Vec<ApiCall>,
}

/// Thread-safe in-memory store
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Fixture>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            records: Arc::new(RwLock::new(fixture)),
        }
    }

    /// Load records from a JSON fixture file
    pub fn load_json(path: &Path) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path).map_err(|source| StoreError::ReadFixture {
            path: path.to_path_buf(),
            source,
        })?;
        let fixture: Fixture =
            serde_json::from_str(&content).map_err(|source| StoreError::ParseFixture {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            path = %path.display(),
            rated = fixture.rated_items.len(),
            matches = fixture.matches.len(),
            queue = fixture.queue.len(),
            api_calls = fixture.api_calls.len(),
            "loaded store fixture"
        );
        Ok(Self::from_fixture(fixture))
    }

    pub fn insert_rated_item(&self, item: RatedItem) {
        self.records.write().rated_items.push(item);
    }

    pub fn insert_match(&self, record: MatchRecord) {
        self.records.write().matches.push(record);
    }

    pub fn insert_queue_item(&self, item: QueueItem) {
        self.records.write().queue.push(item);
    }

    pub fn insert_api_call(&self, call: ApiCall) {
        self.records.write().api_calls.push(call);
    }
}

impl DashboardStore for MemoryStore {
    fn rated_items(&self, query: &Query) -> Result<QueryPage<RatedItem>, StoreError> {
        let records = self.records.read();
        let needle = needle(query);
        let mut items: Vec<&RatedItem> = records
            .rated_items
            .iter()
            .filter(|item| query.admits(item.rated_at))
            .filter(|item| {
                needle.as_deref().is_none_or(|n| {
                    contains_ci(&item.title, n)
                        || item.channel.as_deref().is_some_and(|c| contains_ci(c, n))
                })
            })
            .collect();
        items.sort_by(|a, b| b.rated_at.cmp(&a.rated_at));
        Ok(page_of(items, query))
    }

    /// The outcome and the search text narrow independently
    fn match_history(&self, query: &Query) -> Result<QueryPage<MatchRecord>, StoreError> {
        let records = self.records.read();
        let needle = needle(query);
        let mut items: Vec<&MatchRecord> = records
            .matches
            .iter()
            .filter(|m| query.admits(m.attempted_at))
            .filter(|m| query.outcome.is_none_or(|matched| m.matched == matched))
            .filter(|m| {
                needle.as_deref().is_none_or(|n| {
                    contains_ci(&m.query, n)
                        || m.matched_title.as_deref().is_some_and(|t| contains_ci(t, n))
                })
            })
            .collect();
        items.sort_by(|a, b| b.attempted_at.cmp(&a.attempted_at));
        Ok(page_of(items, query))
    }

    fn queue_items(
        &self,
        tab: QueueTab,
        query: &Query,
    ) -> Result<QueryPage<QueueItem>, StoreError> {
        let records = self.records.read();
        let needle = needle(query);
        let statuses = tab.statuses();
        let mut items: Vec<&QueueItem> = records
            .queue
            .iter()
            .filter(|item| statuses.contains(&item.status))
            .filter(|item| query.admits(item.updated_at.unwrap_or(item.created_at)))
            .filter(|item| {
                needle
                    .as_deref()
                    .is_none_or(|n| contains_ci(&item.subject, n) || item.kind.as_str() == n)
            })
            .collect();
        items.sort_by(|a, b| {
            let a_at = a.updated_at.unwrap_or(a.created_at);
            let b_at = b.updated_at.unwrap_or(b.created_at);
            b_at.cmp(&a_at)
        });
        Ok(page_of(items, query))
    }

    fn queue_counts(&self) -> Result<QueueCounts, StoreError> {
        let records = self.records.read();
        let count = |tab: QueueTab| {
            records
                .queue
                .iter()
                .filter(|item| tab.statuses().contains(&item.status))
                .count()
        };
        Ok(QueueCounts {
            pending: count(QueueTab::Pending),
            history: count(QueueTab::History),
            failed: count(QueueTab::Failed),
        })
    }

    fn api_calls(&self, query: &Query) -> Result<QueryPage<ApiCall>, StoreError> {
        let records = self.records.read();
        let needle = needle(query);
        let mut items: Vec<&ApiCall> = records
            .api_calls
            .iter()
            .filter(|call| query.admits(call.called_at))
            .filter(|call| needle.as_deref().is_none_or(|n| contains_ci(&call.endpoint, n)))
            .collect();
        items.sort_by(|a, b| b.called_at.cmp(&a.called_at));
        Ok(page_of(items, query))
    }

    fn api_call_summary(
        &self,
        since: Option<NaiveDateTime>,
    ) -> Result<ApiCallSummary, StoreError> {
        let records = self.records.read();
        Ok(ApiCallSummary::from_calls(
            records
                .api_calls
                .iter()
                .filter(|call| since.is_none_or(|s| call.called_at >= s)),
        ))
    }
}

/// Lowercased filter text, `None` when the query has no filter
fn needle(query: &Query) -> Option<String> {
    query
        .filter
        .as_deref()
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty())
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

fn page_of<T: Clone>(items: Vec<&T>, query: &Query) -> QueryPage<T> {
    let window = query.window(items.len());
    let page = items[window.range()].iter().map(|item| (*item).clone()).collect();
    QueryPage::new(page, items.len())
}
