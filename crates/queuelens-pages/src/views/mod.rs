//! Dashboard pages.
//!
//! Each view gathers its rows (from a log tail or from the injected
//! [`DashboardStore`](queuelens_store::DashboardStore)), paginates them and
//! assembles the result through a page builder.

mod api_calls;
mod error_logs;
mod queue;
mod queue_logs;
mod records;

pub use api_calls::api_calls_page;
pub use error_logs::{ErrorLogsPage, error_logs_page};
pub use queue::queue_page;
pub use queue_logs::{QueueLogsPage, queue_logs_page};
pub use records::{matches_page, ratings_page};

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::error;

use crate::builder::{ApiCallsPage, Page};
use crate::error::PageError;
use crate::presentation::FilterControl;
use queuelens_logs::TimeWindow;
use queuelens_types::{PeriodFilter, Query};

/// Rows per page when the request doesn't say
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Request parameters shared by every view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewParams {
    /// Requested page, clamped by the view
    pub page: i64,
    pub limit: usize,
    pub period: PeriodFilter,
    /// View-specific selector (level, event type, queue tab, outcome)
    pub filter: String,
    /// Free-text search
    pub search: String,
}

impl ViewParams {
    pub fn time_window(&self, now: NaiveDateTime) -> TimeWindow {
        TimeWindow::new(self.period, now)
    }

    /// Store query for these parameters, bounded by the period
    pub(crate) fn store_query(&self, now: NaiveDateTime) -> Query {
        Query::new(self.page, self.limit)
            .with_filter(self.search.as_str())
            .with_since(self.time_window(now).cutoff())
    }
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            period: PeriodFilter::All,
            filter: "all".to_string(),
            search: String::new(),
        }
    }
}

/// Any page the dashboard can render
#[derive(Clone, Debug)]
pub enum DashboardPage {
    ErrorLogs(ErrorLogsPage),
    QueueLogs(QueueLogsPage),
    ApiCalls(ApiCallsPage),
    Standard(Page),
}

impl DashboardPage {
    pub fn page(&self) -> &Page {
        match self {
            Self::ErrorLogs(p) => &p.page,
            Self::QueueLogs(p) => &p.page,
            Self::ApiCalls(p) => p.page(),
            Self::Standard(p) => p,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::ErrorLogs(p) => p.to_value(),
            Self::QueueLogs(p) => p.to_value(),
            Self::ApiCalls(p) => p.to_value(),
            Self::Standard(p) => p.to_value(),
        }
    }
}

/// Turn a failed render into the generic operator-facing error page.
///
/// The underlying error is logged, never shown.
pub fn recover(tab: &str, err: &PageError) -> Page {
    error!(tab = %tab, error = %err, "failed to render dashboard page");
    Page::operator_error(tab)
}

/// Period dropdown shared by every time-bounded view
pub(crate) fn period_control(selected: PeriodFilter) -> FilterControl {
    PeriodFilter::ALL
        .iter()
        .fold(FilterControl::new("period", "Period"), |control, p| {
            control.option(p.key(), p.label())
        })
        .selected(selected.key())
}

/// "Showing 1-50 of 120 entries"
pub(crate) fn showing(range: std::ops::Range<usize>, total: usize, noun: &str) -> String {
    if total == 0 {
        format!("No {} found", noun)
    } else {
        format!("Showing {}-{} of {} {}", range.start + 1, range.end, total, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuilderValidationError, RequiredField};
    use crate::presentation::StatusTone;

    #[test]
    fn test_recover_hides_detail() {
        let err = PageError::Builder(BuilderValidationError::missing(RequiredField::Table));
        let page = recover("error_logs", &err);
        assert_eq!(page.config().tab, "error_logs");
        assert_eq!(page.status_message().tone, StatusTone::Error);
        assert!(!page.status_message().text.contains("table_data"));
        assert!(page.table().is_empty());
    }

    #[test]
    fn test_period_control() {
        let control = period_control(PeriodFilter::Week);
        assert_eq!(control.options.len(), 5);
        assert_eq!(control.selected, "week");
    }

    #[test]
    fn test_showing() {
        assert_eq!(showing(0..0, 0, "entries"), "No entries found");
        assert_eq!(showing(50..100, 120, "entries"), "Showing 51-100 of 120 entries");
    }
}
