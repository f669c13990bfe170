use chrono::NaiveDateTime;

use queuelens_types::{LogRecord, PeriodFilter};

/// Recency test derived from a period filter and a reference "now"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    period: PeriodFilter,
    cutoff: Option<NaiveDateTime>,
}

impl TimeWindow {
    pub fn new(period: PeriodFilter, now: NaiveDateTime) -> Self {
        let cutoff = period
            .as_duration()
            .and_then(|span| now.checked_sub_signed(span));
        Self { period, cutoff }
    }

    /// Build from a query-string key; unknown keys behave as `all`
    pub fn from_key(key: &str, now: NaiveDateTime) -> Self {
        Self::new(PeriodFilter::from(key), now)
    }

    /// A window that retains everything
    pub fn unbounded() -> Self {
        Self {
            period: PeriodFilter::All,
            cutoff: None,
        }
    }

    pub fn period(&self) -> PeriodFilter {
        self.period
    }

    pub fn cutoff(&self) -> Option<NaiveDateTime> {
        self.cutoff
    }

    /// Inclusive lower bound
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        match self.cutoff {
            Some(cutoff) => timestamp >= cutoff,
            None => true,
        }
    }

    pub fn retains(&self, record: &LogRecord) -> bool {
        self.contains(record.timestamp)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}
