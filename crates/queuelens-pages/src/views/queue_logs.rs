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
    CategoryCounts, ClassifiedRecord, EventCategory, LogReader, QueueStats, RecordFilter,
    scan_log,
};
use queuelens_types::PageWindow;

pub const TAB: &str = "queue_logs";

/// Reloads the page every 30 seconds while it is open
const AUTO_REFRESH_SCRIPT: &str = "setTimeout(function () { window.location.reload(); }, 30000);";

/// Queue processor log page plus its counters
#[derive(Clone, Debug, PartialEq)]
pub struct QueueLogsPage {
    pub page: Page,
    pub stats: QueueStats,
    pub categories: CategoryCounts,
    /// Kept even when the page's pager is cleared for a single page
    pub window: PageWindow,
}

impl QueueLogsPage {
    pub fn to_value(&self) -> Value {
        let mut value = self.page.to_value();
        value["stats"] = serde_json::to_value(&self.stats).unwrap_or_default();
        value["category_counts"] = serde_json::to_value(&self.categories).unwrap_or_default();
        value["count"] = json!(self.window.total_count);
        value["total_pages"] = json!(self.window.total_pages);
        value
    }
}

fn category_control(selected: &str) -> FilterControl {
    EventCategory::ALL
        .iter()
        .fold(
            FilterControl::new("filter", "Event type").option("all", "All events"),
            |control, c| control.option(c.as_str(), c.label()),
        )
        .selected(selected.trim().to_lowercase())
}

fn row(entry: &ClassifiedRecord) -> Value {
    json!({
        "timestamp": entry.record.display_timestamp(),
        "level": entry.record.level,
        "category": entry.category.as_str(),
        "category_label": entry.category.label(),
        "message": entry.record.message,
    })
}

/// Build the queue log page from the tail of `path`.
///
/// Counters are taken over every record in the period; the event type
/// and search filters only narrow the table.
pub fn queue_logs_page(
    reader: &LogReader,
    path: &Path,
    params: &ViewParams,
    now: NaiveDateTime,
) -> Result<QueueLogsPage, PageError> {
    let filter = RecordFilter::new(&params.search)
        .map_err(|e| PageError::Filter {
            pattern: params.search.clone(),
            reason: e.to_string(),
        })?
        .with_category(EventCategory::from_key(&params.filter));

    let scan = scan_log(reader, path, &params.time_window(now), &filter);
    debug!(
        path = %path.display(),
        in_window = scan.in_window,
        shown = scan.len(),
        filtered = !filter.is_empty(),
        search = filter.pattern(),
        "scanned queue log"
    );

    let stats = scan.stats.queue.clone();
    let categories = scan.stats.categories.clone();
    let total = scan.len();
    let paged = paginate(scan.records, params.page, params.limit);

    let mut table = TableData::new([
        ("timestamp", "Time"),
        ("category_label", "Event"),
        ("message", "Message"),
    ]);
    for entry in &paged.items {
        table.push_row(row(entry));
    }

    let status = match scan.error {
        Some(diagnostic) => StatusMessage::warning(format!("Could not read log file: {}", diagnostic)),
        None => StatusMessage::info(format!(
            "{} ({}). {} quota probes, {} recoveries, {} retries, {} resolved",
            showing(paged.window.range(), total, "events"),
            params.period.label(),
            stats.probes,
            stats.recoveries,
            stats.retries,
            stats.resolved
        )),
    };

    let page = PageBuilder::new()
        .tab(TAB)
        .title("Queue Processor")
        .filter(period_control(params.period))
        .filter(category_control(&params.filter))
        .empty_state(EmptyState::new(
            "No queue activity",
            "The queue processor has not logged anything for this period.",
        ))
        .table(table)
        .pagination(Pagination::from_window(&paged.window))
        .status_message(status)
        .custom_script(AUTO_REFRESH_SCRIPT)
        .build()?;

    Ok(QueueLogsPage {
        page,
        stats,
        categories,
        window: paged.window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::StatusTone;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in [
            "2024-03-10 09:00:00 | INFO | Time to check quota",
            "2024-03-10 09:00:05 | INFO | Quota restored, resuming",
            "2024-03-10 09:00:10 | INFO | Found 3 pending videos to retry",
            "2024-03-10 09:01:00 | INFO | ✓ Successfully matched 'lofi beats'",
            "2024-03-10 09:02:00 | ERROR | Search failed: quotaExceeded",
            "2024-03-10 09:03:00 | INFO | Sleeping",
        ] {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_counters_and_categories() {
        let file = sample();
        let result =
            queue_logs_page(&LogReader::default(), file.path(), &ViewParams::default(), now())
                .unwrap();

        assert_eq!(result.stats.probes, 1);
        assert_eq!(result.stats.recoveries, 1);
        assert_eq!(result.stats.retries, 1);
        assert_eq!(result.stats.resolved, 1);
        assert_eq!(result.categories.total(), 6);
        assert_eq!(result.categories.get(EventCategory::Other), 1);

        let rows = &result.page.table().rows;
        assert_eq!(rows[0]["category"], json!("other"));
        assert_eq!(rows[1]["category"], json!("error"));
        assert!(result.page.config().custom_script.is_some());
    }

    #[test]
    fn test_category_filter_narrows_table_only() {
        let file = sample();
        let params = ViewParams {
            filter: "error".to_string(),
            ..ViewParams::default()
        };
        let result = queue_logs_page(&LogReader::default(), file.path(), &params, now()).unwrap();

        assert_eq!(result.page.table().len(), 1);
        assert_eq!(result.categories.total(), 6);
        assert_eq!(result.page.config().filters[1].selected, "error");
    }

    #[test]
    fn test_unknown_category_shows_everything() {
        let file = sample();
        let params = ViewParams {
            filter: "bogus".to_string(),
            ..ViewParams::default()
        };
        let result = queue_logs_page(&LogReader::default(), file.path(), &params, now()).unwrap();

        assert_eq!(result.page.table().len(), 6);
        assert_eq!(result.page.config().filters[1].selected, "all");
    }

    #[test]
    fn test_serializes_counters() {
        let file = sample();
        let result =
            queue_logs_page(&LogReader::default(), file.path(), &ViewParams::default(), now())
                .unwrap();
        let value = result.to_value();

        assert_eq!(value["stats"]["probes"], json!(1));
        assert_eq!(value["category_counts"]["success"], json!(1));
        assert_eq!(result.page.status_message().tone, StatusTone::Info);
        assert_eq!(value["count"], json!(6));
        assert_eq!(value["total_pages"], json!(1));
    }

    #[test]
    fn test_missing_file_reports_zero_counts() {
        let dir = tempfile::tempdir().unwrap();
        let result = queue_logs_page(
            &LogReader::default(),
            &dir.path().join("absent.log"),
            &ViewParams::default(),
            now(),
        )
        .unwrap();

        assert!(result.page.table().is_empty());
        assert_eq!(result.stats, QueueStats::default());

        let value = result.to_value();
        assert_eq!(value["count"], json!(0));
        assert_eq!(value["total_pages"], json!(0));
    }
}
