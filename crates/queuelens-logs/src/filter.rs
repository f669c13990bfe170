use regex::Regex;
use std::collections::HashSet;

use queuelens_types::{EventCategory, LogLevel, LogRecord};

/// Compiled table filter for log records.
///
/// Applied after the time window, so it narrows the table without
/// changing the page's summary counters.
#[derive(Clone)]
pub struct RecordFilter {
    /// Case-insensitive literal search (if any)
    regex: Option<Regex>,

    /// Original search text
    pattern: String,

    /// Severities to include (empty = all)
    levels: HashSet<LogLevel>,

    /// Category to include (None = all)
    category: Option<EventCategory>,
}

impl RecordFilter {
    /// Create a filter matching `search` anywhere in the message, ignoring case
    pub fn new(search: &str) -> Result<Self, regex::Error> {
        let search = search.trim();
        let regex = if search.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("(?i){}", regex::escape(search)))?)
        };

        Ok(Self {
            regex,
            pattern: search.to_string(),
            levels: HashSet::new(),
            category: None,
        })
    }

    /// Filter that matches every record
    pub fn any() -> Self {
        Self {
            regex: None,
            pattern: String::new(),
            levels: HashSet::new(),
            category: None,
        }
    }

    /// Set severities to filter by
    pub fn with_levels(mut self, levels: HashSet<LogLevel>) -> Self {
        self.levels = levels;
        self
    }

    /// Set the event category to filter by
    pub fn with_category(mut self, category: Option<EventCategory>) -> Self {
        self.category = category;
        self
    }

    /// Check if a record (and its category) passes this filter
    pub fn matches(&self, record: &LogRecord, category: EventCategory) -> bool {
        if !self.levels.is_empty() && !self.levels.contains(&record.severity()) {
            return false;
        }

        if self.category.is_some_and(|c| c != category) {
            return false;
        }

        match &self.regex {
            Some(re) => re.is_match(&record.message),
            None => true,
        }
    }

    /// Get the original search text
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check if filter is empty (matches everything)
    pub fn is_empty(&self) -> bool {
        self.regex.is_none() && self.levels.is_empty() && self.category.is_none()
    }
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self::any()
    }
}

impl std::fmt::Debug for RecordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordFilter")
            .field("pattern", &self.pattern)
            .field("levels", &self.levels)
            .field("category", &self.category)
            .finish()
    }
}

/// Severity presets offered by the error log page
pub struct LevelPresets;

impl LevelPresets {
    pub const KEYS: [&'static str; 4] = ["all", "error", "warning", "info"];

    /// Errors and anything worse
    pub fn errors() -> HashSet<LogLevel> {
        HashSet::from([LogLevel::Error, LogLevel::Critical])
    }

    pub fn warnings() -> HashSet<LogLevel> {
        HashSet::from([LogLevel::Warning])
    }

    pub fn info() -> HashSet<LogLevel> {
        HashSet::from([LogLevel::Info])
    }

    /// Preset for a query-string key; unknown keys select every level
    pub fn from_key(key: &str) -> HashSet<LogLevel> {
        match key.trim().to_lowercase().as_str() {
            "error" => Self::errors(),
            "warning" => Self::warnings(),
            "info" => Self::info(),
            _ => HashSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(level: &str, message: &str) -> LogRecord {
        let ts = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        LogRecord::new(ts, level.to_string(), message.to_string())
    }

    #[test]
    fn test_search_is_literal_and_case_insensitive() {
        let filter = RecordFilter::new("Quota (429)").unwrap();
        assert!(filter.matches(&record("ERROR", "search.list quota (429) hit"), EventCategory::Error));
        assert!(!filter.matches(&record("ERROR", "quota 429"), EventCategory::Error));
        assert_eq!(filter.pattern(), "Quota (429)");
    }

    #[test]
    fn test_level_filter() {
        let filter = RecordFilter::any().with_levels(LevelPresets::errors());
        assert!(filter.matches(&record("ERROR", "x"), EventCategory::Other));
        assert!(filter.matches(&record("CRITICAL", "x"), EventCategory::Other));
        assert!(!filter.matches(&record("INFO", "x"), EventCategory::Other));
    }

    #[test]
    fn test_category_filter() {
        let filter = RecordFilter::any().with_category(Some(EventCategory::Retry));
        assert!(filter.matches(&record("INFO", "x"), EventCategory::Retry));
        assert!(!filter.matches(&record("INFO", "x"), EventCategory::Probe));
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let filter = RecordFilter::new("   ").unwrap();
        assert!(filter.is_empty());
        assert!(filter.matches(&record("DEBUG", "anything"), EventCategory::Other));
    }

    #[test]
    fn test_unknown_preset_selects_all() {
        assert!(LevelPresets::from_key("verbose").is_empty());
        assert_eq!(LevelPresets::from_key("WARNING"), LevelPresets::warnings());
    }
}
