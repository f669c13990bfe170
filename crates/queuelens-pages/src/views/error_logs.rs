use std::path::Path;

use chrono::NaiveDateTime;
use serde_json::{Value, json};
use tracing::debug;

use super::{ViewParams, period_control, showing};
use crate::builder::{Page, PageBuilder};
use crate::error::PageError;
use crate::paginate::paginate;
use crate::presentation::{EmptyState, FilterControl, Pagination, StatusMessage, TableData};
use queuelens_logs::{
    ClassifiedRecord, LevelCounts, LevelPresets, LogReader, RecordFilter, scan_log,
};
use queuelens_types::PageWindow;

pub const TAB: &str = "error_logs";

/// Error log page plus per-severity counts over the period
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorLogsPage {
    pub page: Page,
    pub levels: LevelCounts,
    /// Kept even when the page's pager is cleared for a single page
    pub window: PageWindow,
}

impl ErrorLogsPage {
    pub fn to_value(&self) -> Value {
        let mut value = self.page.to_value();
        value["level_counts"] = serde_json::to_value(&self.levels).unwrap_or_default();
        value["count"] = json!(self.window.total_count);
        value["total_pages"] = json!(self.window.total_pages);
        value
    }
}

fn level_control(selected: &str) -> FilterControl {
    LevelPresets::KEYS
        .iter()
        .fold(FilterControl::new("filter", "Level"), |control, key| {
            let label = match *key {
                "all" => "All levels",
                "error" => "Errors",
                "warning" => "Warnings",
                _ => "Info",
            };
            control.option(*key, label)
        })
        .selected(selected.trim().to_lowercase())
}

fn row(entry: &ClassifiedRecord) -> Value {
    json!({
        "timestamp": entry.record.display_timestamp(),
        "level": entry.record.level,
        "severity": entry.record.severity().as_str(),
        "message": entry.record.message,
    })
}

/// Build the error log page from the tail of `path`.
///
/// A file that cannot be read yields an empty table with the read
/// diagnostic as a warning, not an error.
pub fn error_logs_page(
    reader: &LogReader,
    path: &Path,
    params: &ViewParams,
    now: NaiveDateTime,
) -> Result<ErrorLogsPage, PageError> {
    let filter = RecordFilter::new(&params.search)
        .map_err(|e| PageError::Filter {
            pattern: params.search.clone(),
            reason: e.to_string(),
        })?
        .with_levels(LevelPresets::from_key(&params.filter));

    let scan = scan_log(reader, path, &params.time_window(now), &filter);
    debug!(
        path = %path.display(),
        in_window = scan.in_window,
        shown = scan.len(),
        filtered = !filter.is_empty(),
        search = filter.pattern(),
        "scanned error log"
    );

    let levels = scan.stats.levels.clone();
    let total = scan.len();
    let paged = paginate(scan.records, params.page, params.limit);

    let mut table = TableData::new([
        ("timestamp", "Time"),
        ("level", "Level"),
        ("message", "Message"),
    ]);
    for entry in &paged.items {
        table.push_row(row(entry));
    }

    let status = match scan.error {
        Some(diagnostic) => StatusMessage::warning(format!("Could not read log file: {}", diagnostic)),
        None => StatusMessage::info(format!(
            "{} ({})",
            showing(paged.window.range(), total, "entries"),
            params.period.label()
        )),
    };

    let page = PageBuilder::new()
        .tab(TAB)
        .title("Error Logs")
        .filter(period_control(params.period))
        .filter(level_control(&params.filter))
        .empty_state(
            EmptyState::new("No log entries", "Nothing matched the selected period and filters.")
                .icon("check-circle"),
        )
        .table(table)
        .pagination(Pagination::from_window(&paged.window))
        .status_message(status)
        .build()?;

    Ok(ErrorLogsPage {
        page,
        levels,
        window: paged.window,
    })
}
