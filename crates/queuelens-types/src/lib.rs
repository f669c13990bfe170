//! Shared types for queuelens
//!
//! This crate contains data structures used across multiple queuelens crates.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Timestamp layout used by the queue processor's log lines
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Log Types
// ============================================================================

/// Relative time window applied to log record timestamps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodFilter {
    Hour,
    Day,
    Week,
    Month,
    /// No cutoff
    #[default]
    All,
}

impl PeriodFilter {
    pub const ALL: [PeriodFilter; 5] = [
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::All,
    ];

    /// Length of the window, `None` for no cutoff
    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Self::Hour => Some(TimeDelta::hours(1)),
            Self::Day => Some(TimeDelta::hours(24)),
            Self::Week => Some(TimeDelta::days(7)),
            Self::Month => Some(TimeDelta::days(30)),
            Self::All => None,
        }
    }

    /// Query-string key for this period
    pub fn key(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }

    /// Get display label for this period
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hour => "Last hour",
            Self::Day => "Last 24 hours",
            Self::Week => "Last 7 days",
            Self::Month => "Last 30 days",
            Self::All => "All time",
        }
    }
}

/// Unknown keys fall back to `All`
impl From<&str> for PeriodFilter {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "hour" => Self::Hour,
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::All,
        }
    }
}

/// Normalised log severity, derived from a record's free-text level token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
    Unknown,
}

impl LogLevel {
    /// Lowercase key used by filters and counters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" | "trace" => Self::Debug,
            "info" | "inf" | "information" => Self::Info,
            "warn" | "warning" | "wrn" => Self::Warning,
            "error" | "err" => Self::Error,
            "critical" | "crit" | "fatal" => Self::Critical,
            _ => Self::Unknown,
        }
    }
}

/// Semantic bucket assigned to a queue processor message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Probe,
    Retry,
    Success,
    Error,
    Recovery,
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        Self::Probe,
        Self::Retry,
        Self::Success,
        Self::Error,
        Self::Recovery,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Probe => "probe",
            Self::Retry => "retry",
            Self::Success => "success",
            Self::Error => "error",
            Self::Recovery => "recovery",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Probe => "Quota probe",
            Self::Retry => "Retry",
            Self::Success => "Matched",
            Self::Error => "Error",
            Self::Recovery => "Quota restored",
            Self::Other => "Other",
        }
    }

    /// Parse a filter key; `None` for "all" or anything unrecognized
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == key)
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed log line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    /// Parsed timestamp, no timezone attached
    pub timestamp: NaiveDateTime,

    /// Level token exactly as written (ERROR, WARNING, INFO, ...)
    pub level: String,

    /// Remainder of the line
    pub message: String,
}

impl LogRecord {
    pub fn new(timestamp: NaiveDateTime, level: String, message: String) -> Self {
        Self {
            timestamp,
            level,
            message,
        }
    }

    /// Normalised severity of the level token
    pub fn severity(&self) -> LogLevel {
        LogLevel::from(self.level.as_str())
    }

    /// Timestamp rendered in the log's own layout
    pub fn display_timestamp(&self) -> String {
        self.timestamp.format(LOG_TIMESTAMP_FORMAT).to_string()
    }
}

// ============================================================================
// Paging Types
// ============================================================================

/// Which slice of a result set is being shown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Current page, 1-indexed and always clamped
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub limit: usize,
}

impl PageWindow {
    /// Compute the window for a result set, clamping the requested page.
    ///
    /// A zero `limit` is treated as 1.
    pub fn new(total_count: usize, limit: usize, requested_page: i64) -> Self {
        let limit = limit.max(1);
        let total_pages = if total_count > 0 {
            total_count.div_ceil(limit)
        } else {
            0
        };
        let max_page = total_pages.max(1) as i64;
        let page = requested_page.clamp(1, max_page) as usize;

        Self {
            page,
            total_pages,
            total_count,
            limit,
        }
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }

    /// Half-open index range of this page, bounded by `total_count`
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset().min(self.total_count);
        let end = (self.offset() + self.limit).min(self.total_count);
        start..end
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Entry in a compressed page-number list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageNumber {
    Page(usize),
    Ellipsis,
}

impl PageNumber {
    pub const ELLIPSIS: &'static str = "…";
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{}", n),
            Self::Ellipsis => f.write_str(Self::ELLIPSIS),
        }
    }
}

/// Pages serialize as numbers, the gap marker as a string
impl Serialize for PageNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u64(*n as u64),
            Self::Ellipsis => serializer.serialize_str(Self::ELLIPSIS),
        }
    }
}

// ============================================================================
// Store Records
// ============================================================================

/// Page/limit/filter parameters accepted by every store query
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub page: i64,
    pub limit: usize,
    /// Free-text search
    pub filter: Option<String>,
    /// Only records at or after this instant
    pub since: Option<NaiveDateTime>,
    /// Match attempts only: `Some(true)` for matched, `Some(false)` for unmatched
    pub outcome: Option<bool>,
}

impl Query {
    pub fn new(page: i64, limit: usize) -> Self {
        Self {
            page,
            limit,
            filter: None,
            since: None,
            outcome: None,
        }
    }

    pub fn with_filter<S: Into<String>>(mut self, filter: S) -> Self {
        let filter = filter.into();
        self.filter = if filter.trim().is_empty() {
            None
        } else {
            Some(filter)
        };
        self
    }

    pub fn with_since(mut self, since: Option<NaiveDateTime>) -> Self {
        self.since = since;
        self
    }

    pub fn with_outcome(mut self, outcome: Option<bool>) -> Self {
        self.outcome = outcome;
        self
    }

    /// Whether `at` falls inside the query's time bound
    pub fn admits(&self, at: NaiveDateTime) -> bool {
        self.since.is_none_or(|since| at >= since)
    }

    /// Window over a result set of `total_count` items
    pub fn window(&self, total_count: usize) -> PageWindow {
        PageWindow::new(total_count, self.limit, self.page)
    }
}

/// One page of store results plus the unpaged total
#[derive(Clone, Debug, PartialEq)]
pub struct QueryPage<T> {
    pub items: Vec<T>,
    pub total_count: usize,
}

impl<T> QueryPage<T> {
    pub fn new(items: Vec<T>, total_count: usize) -> Self {
        Self { items, total_count }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

/// A video that has been rated
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatedItem {
    pub id: i64,
    pub video_id: String,
    pub title: String,
    pub channel: Option<String>,
    /// 1 to 5
    pub rating: u8,
    pub rated_at: NaiveDateTime,
}

/// Outcome of one attempt to match a search to a video
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: i64,
    pub query: String,
    pub video_id: Option<String>,
    pub matched_title: Option<String>,
    pub matched: bool,
    pub attempted_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueItemKind {
    Search,
    Rating,
}

impl QueueItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Rating => "rating",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// A unit of deferred background work
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: i64,
    pub kind: QueueItemKind,
    pub status: QueueStatus,
    /// Search query or video id the work applies to
    pub subject: String,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub last_error: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Tab on the queue page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum QueueTab {
    #[default]
    Pending,
    History,
    Failed,
}

impl QueueTab {
    pub const ALL: [QueueTab; 3] = [Self::Pending, Self::History, Self::Failed];

    /// Statuses shown on this tab
    pub fn statuses(&self) -> &'static [QueueStatus] {
        match self {
            Self::Pending => &[QueueStatus::Pending, QueueStatus::Processing],
            Self::History => &[QueueStatus::Completed],
            Self::Failed => &[QueueStatus::Failed],
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::History => "history",
            Self::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::History => "History",
            Self::Failed => "Failed",
        }
    }
}

impl From<&str> for QueueTab {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "history" => Self::History,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// One outbound call to the video platform's API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiCall {
    pub id: i64,
    pub endpoint: String,
    pub status_code: u16,
    /// Quota units charged for the call
    pub quota_cost: u32,
    pub duration_ms: u64,
    pub called_at: NaiveDateTime,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiCall {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Aggregate figures shown above the API call table
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ApiCallSummary {
    pub total_calls: usize,
    pub successful_calls: usize,
    pub failed_calls: usize,
    pub quota_used: u64,
    pub avg_duration_ms: f64,
}

impl ApiCallSummary {
    pub fn from_calls<'a, I>(calls: I) -> Self
    where
        I: IntoIterator<Item = &'a ApiCall>,
    {
        let mut summary = Self::default();
        let mut total_duration: u64 = 0;

        for call in calls {
            summary.total_calls += 1;
            if call.is_success() {
                summary.successful_calls += 1;
            } else {
                summary.failed_calls += 1;
            }
            summary.quota_used += u64::from(call.quota_cost);
            total_duration += call.duration_ms;
        }

        if summary.total_calls > 0 {
            summary.avg_duration_ms = total_duration as f64 / summary.total_calls as f64;
        }

        summary
    }

    /// Share of calls that succeeded, 0.0 when there were none
    pub fn success_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.successful_calls as f64 / self.total_calls as f64
        }
    }
}
