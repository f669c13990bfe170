use std::path::Path;

use queuelens_types::{EventCategory, LogRecord};

use crate::classify::EventClassifier;
use crate::filter::RecordFilter;
use crate::parser::RecordParser;
use crate::reader::LogReader;
use crate::stats::{StatsAggregator, StatsSnapshot};
use crate::window::TimeWindow;

/// A parsed record together with its derived category
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedRecord {
    pub record: LogRecord,
    pub category: EventCategory,
}

/// Result of one pass over a log tail
#[derive(Clone, Debug, Default)]
pub struct LogScan {
    /// Records passing the window and the filter, newest first
    pub records: Vec<ClassifiedRecord>,

    /// Counters over every record inside the window
    pub stats: StatsSnapshot,

    /// Parsed records inside the window, before the table filter
    pub in_window: usize,

    /// Read diagnostic, if the file could not be read
    pub error: Option<String>,
}

impl LogScan {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read, parse, window, classify, count and filter the tail of `path`
pub fn scan_log(
    reader: &LogReader,
    path: &Path,
    window: &TimeWindow,
    filter: &RecordFilter,
) -> LogScan {
    let tail = reader.read_tail(path);
    let mut scan = scan_lines(&tail.lines, window, filter);
    scan.error = tail.error;
    scan
}

/// Same as [`scan_log`] over lines already in memory (oldest first)
pub fn scan_lines<S: AsRef<str>>(
    lines: &[S],
    window: &TimeWindow,
    filter: &RecordFilter,
) -> LogScan {
    let mut stats = StatsAggregator::new();
    let mut records = Vec::new();
    let mut in_window = 0;

    for record in lines.iter().filter_map(|line| RecordParser::parse(line.as_ref())) {
        if !window.retains(&record) {
            continue;
        }
        in_window += 1;

        let category = EventClassifier::classify(&record.message);
        stats.push(&record, category);

        if filter.matches(&record, category) {
            records.push(ClassifiedRecord { record, category });
        }
    }

    records.reverse();

    LogScan {
        records,
        stats: stats.snapshot(),
        in_window,
        error: None,
    }
}
