use serde_json::json;

use super::{ViewParams, showing};
use crate::builder::{Page, PageBuilder};
use crate::error::PageError;
use crate::presentation::{EmptyState, FilterControl, Pagination, StatusMessage, TableData};
use queuelens_store::{DashboardStore, QueueCounts, QueueTab};
use queuelens_types::{LOG_TIMESTAMP_FORMAT, Query};

pub const TAB: &str = "queue";

fn tab_control(selected: QueueTab, counts: &QueueCounts) -> FilterControl {
    QueueTab::ALL
        .iter()
        .fold(FilterControl::new("filter", "Queue"), |control, tab| {
            control.option(tab.key(), format!("{} ({})", tab.label(), counts.get(*tab)))
        })
        .selected(selected.key())
}

fn empty_state(tab: QueueTab) -> EmptyState {
    match tab {
        QueueTab::Pending => {
            EmptyState::new("Queue is empty", "No work is waiting to be processed.").icon("inbox")
        }
        QueueTab::History => EmptyState::new("No history yet", "Completed work will show up here."),
        QueueTab::Failed => {
            EmptyState::new("No failures", "Nothing in the queue has failed.").icon("check-circle")
        }
    }
}

/// Build the work queue page for one tab.
///
/// `params.filter` selects the tab; queue items are not bounded by the
/// period filter.
pub fn queue_page(store: &dyn DashboardStore, params: &ViewParams) -> Result<Page, PageError> {
    let tab = QueueTab::from(params.filter.as_str());
    let query = Query::new(params.page, params.limit).with_filter(params.search.as_str());

    let counts = store.queue_counts()?;
    let items = store.queue_items(tab, &query)?;
    let window = query.window(items.total_count);

    let mut table = TableData::new([
        ("id", "ID"),
        ("kind", "Type"),
        ("subject", "Subject"),
        ("status", "Status"),
        ("attempts", "Attempts"),
        ("updated_at", "Updated"),
        ("last_error", "Last error"),
    ]);
    for item in &items.items {
        let updated = item.updated_at.unwrap_or(item.created_at);
        table.push_row(json!({
            "id": item.id,
            "kind": item.kind.as_str(),
            "subject": item.subject,
            "status": item.status.as_str(),
            "attempts": item.attempts,
            "created_at": item.created_at.format(LOG_TIMESTAMP_FORMAT).to_string(),
            "updated_at": updated.format(LOG_TIMESTAMP_FORMAT).to_string(),
            "last_error": item.last_error,
        }));
    }

    let status = match tab {
        QueueTab::Failed if items.total_count > 0 => StatusMessage::warning(format!(
            "{} item(s) failed and will not be retried",
            items.total_count
        )),
        _ => StatusMessage::info(showing(window.range(), items.total_count, "items")),
    };

    let page = PageBuilder::new()
        .tab(TAB)
        .title(format!("Queue: {}", tab.label()))
        .filter(tab_control(tab, &counts))
        .empty_state(empty_state(tab))
        .table(table)
        .pagination(Pagination::from_window(&window))
        .status_message(status)
        .build()?;

    Ok(page)
}
