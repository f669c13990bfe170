//! Log processing for queuelens
//!
//! This crate provides bounded tail reads, line parsing, time windows,
//! event classification, counters and filtering over the queue processor's
//! text logs.

mod classify;
mod filter;
mod parser;
mod reader;
mod scan;
mod stats;
mod window;

pub use classify::{CHECKMARKS, CROSSMARKS, EventClassifier, Predicate};
pub use filter::{LevelPresets, RecordFilter};
pub use parser::RecordParser;
pub use reader::{DEFAULT_TAIL_LINES, LogReader, TailRead};
pub use scan::{ClassifiedRecord, LogScan, scan_lines, scan_log};
pub use stats::{CategoryCounts, LevelCounts, QueueStats, StatsAggregator, StatsSnapshot};
pub use window::TimeWindow;

// Re-export types used in our public API
pub use queuelens_types::{EventCategory, LogLevel, LogRecord, PeriodFilter};
