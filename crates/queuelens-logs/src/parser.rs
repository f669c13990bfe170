use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use queuelens_types::{LOG_TIMESTAMP_FORMAT, LogRecord};

/// `TIMESTAMP | LEVEL | MESSAGE`, timestamp as `YYYY-MM-DD HH:MM:SS`
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) \| (\w+) \| (.*)$").unwrap()
});

/// Parser for the queue processor's pipe-delimited log lines
pub struct RecordParser;

impl RecordParser {
    /// Parse one raw line.
    ///
    /// Lines that don't match the three-field layout, and lines whose
    /// timestamp is not a real calendar instant, yield `None`.
    pub fn parse(raw: &str) -> Option<LogRecord> {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }

        let caps = LINE_PATTERN.captures(line)?;
        let timestamp = NaiveDateTime::parse_from_str(&caps[1], LOG_TIMESTAMP_FORMAT).ok()?;

        Some(LogRecord::new(
            timestamp,
            caps[2].to_string(),
            caps[3].to_string(),
        ))
    }

    /// Parse every line, silently dropping the ones that don't parse
    pub fn parse_all<I, S>(lines: I) -> Vec<LogRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| Self::parse(line.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_well_formed_line() {
        let record = RecordParser::parse("2025-01-01 00:00:00 | ERROR | disk full").unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(record.timestamp, expected);
        assert_eq!(record.level, "ERROR");
        assert_eq!(record.message, "disk full");
    }

    #[test]
    fn test_message_keeps_inner_pipes() {
        let record =
            RecordParser::parse("  2025-03-04 12:30:45 | INFO | a | b | c  ").unwrap();
        assert_eq!(record.message, "a | b | c");
    }

    #[test]
    fn test_line_without_delimiters_is_dropped() {
        assert!(RecordParser::parse("2025-01-01 00:00:00 ERROR disk full").is_none());
        assert!(RecordParser::parse("Traceback (most recent call last):").is_none());
        assert!(RecordParser::parse("   ").is_none());
    }

    #[test]
    fn test_invalid_timestamp_is_dropped() {
        assert!(RecordParser::parse("2025-13-01 00:00:00 | ERROR | bad month").is_none());
        assert!(RecordParser::parse("2025-02-30 10:00:00 | INFO | bad day").is_none());
        assert!(RecordParser::parse("2025-01-01 25:00:00 | INFO | bad hour").is_none());
    }

    #[test]
    fn test_level_must_be_word_characters() {
        assert!(RecordParser::parse("2025-01-01 00:00:00 | | empty level").is_none());
        assert!(RecordParser::parse("2025-01-01 00:00:00 | WARN-ISH | odd").is_none());
    }

    #[test]
    fn test_parse_all_skips_noise() {
        let lines = [
            "2025-01-01 00:00:00 | INFO | started",
            "    at some.frame(line 3)",
            "",
            "2025-01-01 00:00:05 | WARNING | slow response",
        ];
        let records = RecordParser::parse_all(lines);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].level, "WARNING");
    }

    #[test]
    fn test_parse_multibyte_utf8_no_panic() {
        let record = RecordParser::parse("2025-01-01 00:00:00 | INFO | ✅ matched ╭──╮").unwrap();
        assert!(record.message.starts_with('✅'));
        assert!(RecordParser::parse("─────────────────────").is_none());
    }
}
