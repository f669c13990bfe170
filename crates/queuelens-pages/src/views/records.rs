use chrono::NaiveDateTime;
use serde_json::json;

use super::{ViewParams, period_control, showing};
use crate::builder::{Page, PageBuilder};
use crate::error::PageError;
use crate::presentation::{EmptyState, FilterControl, Pagination, StatusMessage, TableData};
use queuelens_store::DashboardStore;
use queuelens_types::LOG_TIMESTAMP_FORMAT;

pub const RATINGS_TAB: &str = "ratings";
pub const MATCHES_TAB: &str = "matches";

/// Rated videos, newest first
pub fn ratings_page(
    store: &dyn DashboardStore,
    params: &ViewParams,
    now: NaiveDateTime,
) -> Result<Page, PageError> {
    let query = params.store_query(now);
    let rated = store.rated_items(&query)?;
    let window = query.window(rated.total_count);

    let mut table = TableData::new([
        ("rated_at", "Rated"),
        ("title", "Title"),
        ("channel", "Channel"),
        ("rating", "Rating"),
    ]);
    for item in &rated.items {
        table.push_row(json!({
            "id": item.id,
            "video_id": item.video_id,
            "title": item.title,
            "channel": item.channel,
            "rating": item.rating,
            "stars": "★".repeat(usize::from(item.rating.min(5))),
            "rated_at": item.rated_at.format(LOG_TIMESTAMP_FORMAT).to_string(),
        }));
    }

    let page = PageBuilder::new()
        .tab(RATINGS_TAB)
        .title("Ratings")
        .filter(period_control(params.period))
        .empty_state(EmptyState::new(
            "No ratings",
            "No videos were rated in this period.",
        ))
        .table(table)
        .pagination(Pagination::from_window(&window))
        .status_message(StatusMessage::info(showing(
            window.range(),
            rated.total_count,
            "ratings",
        )))
        .build()?;

    Ok(page)
}

fn outcome_control(selected: &str) -> FilterControl {
    FilterControl::new("filter", "Outcome")
        .option("all", "All attempts")
        .option("matched", "Matched")
        .option("unmatched", "Unmatched")
        .selected(selected.trim().to_lowercase())
}

/// Search-to-video match attempts, newest first.
///
/// `params.filter` narrows by outcome (`matched` / `unmatched`) and the
/// search text narrows independently of it.
pub fn matches_page(
    store: &dyn DashboardStore,
    params: &ViewParams,
    now: NaiveDateTime,
) -> Result<Page, PageError> {
    let outcome = outcome_control(&params.filter);
    let matched = match outcome.selected.as_str() {
        "matched" => Some(true),
        "unmatched" => Some(false),
        _ => None,
    };
    let query = params.store_query(now).with_outcome(matched);

    let history = store.match_history(&query)?;
    let window = query.window(history.total_count);

    let mut table = TableData::new([
        ("attempted_at", "Attempted"),
        ("query", "Search"),
        ("matched_title", "Matched video"),
        ("outcome", "Outcome"),
    ]);
    for record in &history.items {
        table.push_row(json!({
            "id": record.id,
            "query": record.query,
            "video_id": record.video_id,
            "matched_title": record.matched_title,
            "matched": record.matched,
            "outcome": if record.matched { "Matched" } else { "No match" },
            "attempted_at": record.attempted_at.format(LOG_TIMESTAMP_FORMAT).to_string(),
        }));
    }

    let page = PageBuilder::new()
        .tab(MATCHES_TAB)
        .title("Match History")
        .filter(period_control(params.period))
        .filter(outcome)
        .empty_state(EmptyState::new(
            "No match attempts",
            "No searches were matched in this period.",
        ))
        .table(table)
        .pagination(Pagination::from_window(&window))
        .status_message(StatusMessage::info(showing(
            window.range(),
            history.total_count,
            "attempts",
        )))
        .build()?;

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use queuelens_store::{MatchRecord, MemoryStore, RatedItem};
    use queuelens_types::PeriodFilter;
    use serde_json::Value;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn rated(id: i64, title: &str, days_ago: i64) -> RatedItem {
        RatedItem {
            id,
            video_id: format!("vid{}", id),
            title: title.to_string(),
            channel: Some("Chill Channel".to_string()),
            rating: 4,
            rated_at: now() - TimeDelta::days(days_ago),
        }
    }

    fn attempt(id: i64, query: &str, matched: bool) -> MatchRecord {
        MatchRecord {
            id,
            query: query.to_string(),
            video_id: matched.then(|| format!("vid{}", id)),
            matched_title: matched.then(|| query.to_uppercase()),
            matched,
            attempted_at: now() - TimeDelta::minutes(id),
        }
    }

    #[test]
    fn test_ratings_newest_first() {
        let store = MemoryStore::new();
        store.insert_rated_item(rated(1, "Old song", 20));
        store.insert_rated_item(rated(2, "New song", 1));

        let page = ratings_page(&store, &ViewParams::default(), now()).unwrap();
        assert_eq!(page.config().tab, RATINGS_TAB);
        assert_eq!(page.table().rows[0]["title"], json!("New song"));
        assert_eq!(page.table().rows[0]["stars"], json!("★★★★"));
        assert_eq!(page.status_message().text, "Showing 1-2 of 2 ratings");

        let params = ViewParams {
            period: PeriodFilter::Week,
            ..ViewParams::default()
        };
        let page = ratings_page(&store, &params, now()).unwrap();
        assert_eq!(page.table().len(), 1);
    }

    #[test]
    fn test_ratings_paginated() {
        let store = MemoryStore::new();
        for id in 0..12 {
            store.insert_rated_item(rated(id, "Song", id));
        }
        let params = ViewParams {
            page: 2,
            limit: 5,
            ..ViewParams::default()
        };
        let page = ratings_page(&store, &params, now()).unwrap();

        assert_eq!(page.table().len(), 5);
        assert_eq!(page.pagination().map(|p| p.total_pages), Some(3));
        assert_eq!(page.status_message().text, "Showing 6-10 of 12 ratings");
    }

    #[test]
    fn test_matches_outcome_filter() {
        let store = MemoryStore::new();
        store.insert_match(attempt(1, "lofi beats", true));
        store.insert_match(attempt(2, "obscure demo", false));
        store.insert_match(attempt(3, "jazz piano", true));

        let all = matches_page(&store, &ViewParams::default(), now()).unwrap();
        assert_eq!(all.table().len(), 3);
        assert_eq!(all.table().rows[0]["query"], json!("lofi beats"));

        let params = ViewParams {
            filter: "unmatched".to_string(),
            ..ViewParams::default()
        };
        let unmatched = matches_page(&store, &params, now()).unwrap();
        assert_eq!(unmatched.table().len(), 1);
        assert_eq!(unmatched.table().rows[0]["outcome"], json!("No match"));
        assert_eq!(unmatched.config().filters[1].selected, "unmatched");
    }

    #[test]
    fn test_matches_outcome_with_search() {
        let store = MemoryStore::new();
        store.insert_match(attempt(1, "matched pairs - song", true));
        store.insert_match(attempt(2, "other - tune", false));
        store.insert_match(attempt(3, "third - tune", true));

        let ids = |filter: &str, search: &str| -> Vec<Value> {
            let params = ViewParams {
                filter: filter.to_string(),
                search: search.to_string(),
                ..ViewParams::default()
            };
            let page = matches_page(&store, &params, now()).unwrap();
            page.table().rows.iter().map(|row| row["id"].clone()).collect()
        };

        assert_eq!(ids("all", "matched"), vec![json!(1)]);
        assert_eq!(ids("unmatched", "tune"), vec![json!(2)]);
        assert_eq!(ids("matched", "tune"), vec![json!(3)]);
        assert_eq!(ids("matched", ""), vec![json!(1), json!(3)]);
    }

    #[test]
    fn test_matches_search() {
        let store = MemoryStore::new();
        store.insert_match(attempt(1, "lofi beats", true));
        store.insert_match(attempt(2, "jazz piano", true));

        let params = ViewParams {
            search: "jazz".to_string(),
            ..ViewParams::default()
        };
        let page = matches_page(&store, &params, now()).unwrap();
        assert_eq!(page.table().len(), 1);
        assert_eq!(page.table().rows[0]["matched_title"], json!("JAZZ PIANO"));
    }
}
