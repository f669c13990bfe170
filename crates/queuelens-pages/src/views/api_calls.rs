use chrono::NaiveDateTime;
use serde_json::json;

use super::{ViewParams, period_control, showing};
use crate::builder::{ApiCallsPage, ApiCallsPageBuilder};
use crate::error::PageError;
use crate::presentation::{EmptyState, Pagination, StatusMessage, TableData};
use queuelens_store::DashboardStore;
use queuelens_types::LOG_TIMESTAMP_FORMAT;

/// Build the API calls page.
///
/// The search text narrows the table only; the summary figures always
/// cover every call in the period and the status line says so.
pub fn api_calls_page(
    store: &dyn DashboardStore,
    params: &ViewParams,
    now: NaiveDateTime,
) -> Result<ApiCallsPage, PageError> {
    let query = params.store_query(now);
    let calls = store.api_calls(&query)?;
    let summary = store.api_call_summary(query.since)?;
    let window = query.window(calls.total_count);

    let mut table = TableData::new([
        ("called_at", "Time"),
        ("endpoint", "Endpoint"),
        ("status_code", "Status"),
        ("quota_cost", "Quota"),
        ("duration_ms", "Duration (ms)"),
        ("error", "Error"),
    ]);
    for call in &calls.items {
        table.push_row(json!({
            "called_at": call.called_at.format(LOG_TIMESTAMP_FORMAT).to_string(),
            "endpoint": call.endpoint,
            "status_code": call.status_code,
            "success": call.is_success(),
            "quota_cost": call.quota_cost,
            "duration_ms": call.duration_ms,
            "error": call.error,
        }));
    }

    let text = format!(
        "{}. {} total: {} calls, {} quota units used, {:.0}% succeeded",
        showing(window.range(), calls.total_count, "calls"),
        params.period.label(),
        summary.total_calls,
        summary.quota_used,
        summary.success_rate() * 100.0
    );
    let status = match summary.failed_calls {
        0 => StatusMessage::info(text),
        _ => StatusMessage::warning(text),
    };

    let page = ApiCallsPageBuilder::new()
        .title("API Calls")
        .filter(period_control(params.period))
        .empty_state(EmptyState::new(
            "No API calls",
            "No calls to the video API were recorded in this period.",
        ))
        .table(table)
        .pagination(Pagination::from_window(&window))
        .status_message(status)
        .summary_statistics(summary)
        .build()?;

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::StatusTone;
    use chrono::{NaiveDate, TimeDelta};
    use queuelens_store::{
        ApiCall, ApiCallSummary, MatchRecord, MemoryStore, Query, QueryPage, QueueCounts,
        QueueItem, QueueTab, RatedItem, StoreError,
    };
    use queuelens_types::PeriodFilter;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn call(id: i64, status_code: u16, hours_ago: i64) -> ApiCall {
        ApiCall {
            id,
            endpoint: "search.list".to_string(),
            status_code,
            quota_cost: 100,
            duration_ms: 200,
            called_at: now() - TimeDelta::hours(hours_ago),
            error: (status_code >= 400).then(|| "quotaExceeded".to_string()),
        }
    }

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_api_call(call(1, 200, 1));
        store.insert_api_call(call(2, 403, 2));
        store.insert_api_call(call(3, 200, 72));
        store
    }

    #[test]
    fn test_summary_follows_period() {
        let store = store();
        let params = ViewParams {
            period: PeriodFilter::Day,
            ..ViewParams::default()
        };
        let page = api_calls_page(&store, &params, now()).unwrap();

        assert_eq!(page.page().table().len(), 2);
        assert_eq!(page.summary().total_calls, 2);
        assert_eq!(page.summary().failed_calls, 1);
        assert_eq!(page.summary().quota_used, 200);
        assert_eq!(page.page().status_message().tone, StatusTone::Warning);
    }

    #[test]
    fn test_all_time() {
        let store = store();
        let page = api_calls_page(&store, &ViewParams::default(), now()).unwrap();

        assert_eq!(page.summary().total_calls, 3);
        let rows = &page.page().table().rows;
        assert_eq!(rows[0]["status_code"], json!(200));
        assert_eq!(rows[1]["error"], json!("quotaExceeded"));
        assert_eq!(page.to_value()["summary_statistics"]["successful_calls"], json!(2));
    }

    #[test]
    fn test_search_narrows_table_not_summary() {
        let store = store();
        store.insert_api_call(ApiCall {
            endpoint: "videos.rate".to_string(),
            ..call(4, 200, 3)
        });
        let params = ViewParams {
            search: "rate".to_string(),
            ..ViewParams::default()
        };
        let page = api_calls_page(&store, &params, now()).unwrap();

        assert_eq!(page.page().table().len(), 1);
        assert_eq!(page.summary().total_calls, 4);
        assert_eq!(
            page.page().status_message().text,
            "Showing 1-1 of 1 calls. All time total: 4 calls, 400 quota units used, 75% succeeded"
        );
    }

    #[test]
    fn test_empty_store() {
        let page = api_calls_page(&MemoryStore::new(), &ViewParams::default(), now()).unwrap();
        assert!(page.page().table().is_empty());
        assert_eq!(page.page().status_message().tone, StatusTone::Info);
        assert!(page.page().status_message().text.starts_with("No calls found"));
    }

    struct Offline;

    impl DashboardStore for Offline {
        fn rated_items(&self, _: &Query) -> Result<QueryPage<RatedItem>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn match_history(&self, _: &Query) -> Result<QueryPage<MatchRecord>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn queue_items(&self, _: QueueTab, _: &Query) -> Result<QueryPage<QueueItem>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn queue_counts(&self) -> Result<QueueCounts, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn api_calls(&self, _: &Query) -> Result<QueryPage<ApiCall>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn api_call_summary(&self, _: Option<NaiveDateTime>) -> Result<ApiCallSummary, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_store_failure_propagates() {
        let err = api_calls_page(&Offline, &ViewParams::default(), now()).unwrap_err();
        assert!(matches!(err, PageError::Store(StoreError::Unavailable(_))));
    }
}
