//! Presentation objects handed to the rendering layer.
//!
//! Each object serializes to a plain nested mapping via `to_value()` so a
//! template engine can substitute it directly.

use serde::Serialize;
use serde_json::Value;

use crate::paginate::generate_page_numbers;
use queuelens_types::{PageNumber, PageWindow};

/// One selectable value of a filter control
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// A dropdown-style filter rendered above the table
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterControl {
    /// Query-string parameter name
    pub name: String,
    pub label: String,
    pub options: Vec<FilterOption>,
    pub selected: String,
}

impl FilterControl {
    pub fn new<N: Into<String>, L: Into<String>>(name: N, label: L) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            options: Vec::new(),
            selected: String::new(),
        }
    }

    pub fn option<V: Into<String>, L: Into<String>>(mut self, value: V, label: L) -> Self {
        self.options.push(FilterOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    /// Mark `value` as selected; falls back to the first option if unknown
    pub fn selected<V: Into<String>>(mut self, value: V) -> Self {
        let value = value.into();
        self.selected = if self.options.iter().any(|o| o.value == value) {
            value
        } else {
            self.options
                .first()
                .map(|o| o.value.clone())
                .unwrap_or_default()
        };
        self
    }
}

/// What the table area shows when there are no rows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub icon: Option<String>,
    pub title: String,
    pub message: String,
}

impl EmptyState {
    pub fn new<T: Into<String>, M: Into<String>>(title: T, message: M) -> Self {
        Self {
            icon: None,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn icon<I: Into<String>>(mut self, icon: I) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Page identity, heading and controls
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageConfig {
    pub tab: String,
    pub title: String,
    pub filters: Vec<FilterControl>,
    pub empty_state: Option<EmptyState>,
    /// Extra client-side script injected by the template
    pub custom_script: Option<String>,
}

impl PageConfig {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Key of the matching field in every row
    pub key: String,
    pub label: String,
}

/// Column headings plus one JSON object per row
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TableData {
    pub columns: Vec<Column>,
    pub rows: Vec<Value>,
}

impl TableData {
    /// Create a table from `(key, label)` column pairs
    pub fn new<I, K, L>(columns: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(key, label)| Column {
                    key: key.into(),
                    label: label.into(),
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Value) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Pager rendered under the table
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub limit: usize,
    pub page_numbers: Vec<PageNumber>,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
}

impl Pagination {
    pub fn from_window(window: &PageWindow) -> Self {
        Self {
            current_page: window.page,
            total_pages: window.total_pages,
            total_count: window.total_count,
            limit: window.limit,
            page_numbers: generate_page_numbers(window.page as i64, window.total_pages as i64),
            prev_page: window.has_prev().then(|| window.page - 1),
            next_page: window.has_next().then(|| window.page + 1),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    #[default]
    Info,
    Warning,
    Error,
}

/// One-line status shown above the table
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub tone: StatusTone,
}

impl StatusMessage {
    pub fn info<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Info,
        }
    }

    pub fn warning<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Warning,
        }
    }

    pub fn error<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_control_selection() {
        let control = FilterControl::new("period", "Period")
            .option("day", "Last 24 hours")
            .option("all", "All time")
            .selected("all");
        assert_eq!(control.selected, "all");

        let fallback = control.clone().selected("decade");
        assert_eq!(fallback.selected, "day");
    }

    #[test]
    fn test_table_to_value() {
        let mut table = TableData::new([("level", "Level"), ("message", "Message")]);
        table.push_row(json!({"level": "ERROR", "message": "disk full"}));

        assert_eq!(
            table.to_value(),
            json!({
                "columns": [
                    {"key": "level", "label": "Level"},
                    {"key": "message", "label": "Message"}
                ],
                "rows": [{"level": "ERROR", "message": "disk full"}]
            })
        );
    }

    #[test]
    fn test_pagination_from_window() {
        let pagination = Pagination::from_window(&PageWindow::new(500, 10, 10));
        assert_eq!(pagination.prev_page, Some(9));
        assert_eq!(pagination.next_page, Some(11));

        let value = pagination.to_value();
        assert_eq!(value["total_pages"], json!(50));
        assert_eq!(value["page_numbers"], json!([1, "…", 8, 9, 10, 11, 12, "…", 50]));
    }

    #[test]
    fn test_config_to_value() {
        let config = PageConfig {
            tab: "error_logs".to_string(),
            title: "Error Logs".to_string(),
            filters: Vec::new(),
            empty_state: Some(EmptyState::new("Nothing here", "No errors").icon("check")),
            custom_script: None,
        };
        let value = config.to_value();
        assert_eq!(value["tab"], json!("error_logs"));
        assert_eq!(value["empty_state"]["icon"], json!("check"));
        assert_eq!(value["custom_script"], Value::Null);
    }
}
