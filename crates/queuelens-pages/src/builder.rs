use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{BuilderValidationError, RequiredField};
use crate::presentation::{
    EmptyState, FilterControl, PageConfig, Pagination, StatusMessage, TableData,
};
use queuelens_types::ApiCallSummary;

/// Where a builder is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStage {
    /// Nothing set yet
    Empty,
    /// At least one field set, not yet validated
    Configured,
    /// Every required field present
    Validated,
}

/// A finished dashboard page
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    config: PageConfig,
    table: TableData,
    pagination: Option<Pagination>,
    status_message: StatusMessage,
}

impl Page {
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn table(&self) -> &TableData {
        &self.table
    }

    /// `None` when everything fits on one page
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn status_message(&self) -> &StatusMessage {
        &self.status_message
    }

    pub fn into_parts(self) -> (PageConfig, TableData, Option<Pagination>, StatusMessage) {
        (self.config, self.table, self.pagination, self.status_message)
    }

    /// Generic error page for `tab` that reveals nothing about the failure
    pub(crate) fn operator_error(tab: &str) -> Self {
        Self {
            config: PageConfig {
                tab: tab.to_string(),
                title: "Something went wrong".to_string(),
                filters: Vec::new(),
                empty_state: Some(EmptyState::new(
                    "Page unavailable",
                    "This page could not be loaded. Check the service logs for details.",
                )),
                custom_script: None,
            },
            table: TableData::default(),
            pagination: None,
            status_message: StatusMessage::error("An error occurred while loading this page."),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "config": self.config.to_value(),
            "table": self.table.to_value(),
            "pagination": self.pagination.as_ref().map(Pagination::to_value),
            "status_message": self.status_message,
        })
    }
}

/// Single-use, validating constructor for [`Page`].
///
/// Setters can be chained in any order. [`PageBuilder::build`] consumes
/// the builder and fails if the tab, the table or the status message was
/// never set.
#[derive(Clone, Debug)]
pub struct PageBuilder {
    stage: BuildStage,
    tab: Option<String>,
    title: Option<String>,
    filters: Vec<FilterControl>,
    empty_state: Option<EmptyState>,
    custom_script: Option<String>,
    table: Option<TableData>,
    pagination: Option<Pagination>,
    status_message: Option<StatusMessage>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self {
            stage: BuildStage::Empty,
            tab: None,
            title: None,
            filters: Vec::new(),
            empty_state: None,
            custom_script: None,
            table: None,
            pagination: None,
            status_message: None,
        }
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    /// Establish the page's identity
    pub fn tab<S: Into<String>>(mut self, tab: S) -> Self {
        self.tab = Some(tab.into());
        self.touch()
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self.touch()
    }

    pub fn filter(mut self, filter: FilterControl) -> Self {
        self.filters.push(filter);
        self.touch()
    }

    pub fn empty_state(mut self, empty_state: EmptyState) -> Self {
        self.empty_state = Some(empty_state);
        self.touch()
    }

    pub fn table(mut self, table: TableData) -> Self {
        self.table = Some(table);
        self.touch()
    }

    /// Set the pager; a single page (or none) clears it
    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = (pagination.total_pages > 1).then_some(pagination);
        self.touch()
    }

    pub fn status_message(mut self, status: StatusMessage) -> Self {
        self.status_message = Some(status);
        self.touch()
    }

    pub fn custom_script<S: Into<String>>(mut self, script: S) -> Self {
        self.custom_script = Some(script.into());
        self.touch()
    }

    fn touch(mut self) -> Self {
        self.stage = BuildStage::Configured;
        self
    }

    /// Check that every required field is present
    pub fn validate(&mut self) -> Result<(), BuilderValidationError> {
        if self.tab.is_none() {
            return Err(BuilderValidationError::missing(RequiredField::Tab));
        }
        if self.table.is_none() {
            return Err(BuilderValidationError::missing(RequiredField::Table));
        }
        if self.status_message.is_none() {
            return Err(BuilderValidationError::missing(RequiredField::StatusMessage));
        }

        self.stage = BuildStage::Validated;
        Ok(())
    }

    pub fn build(mut self) -> Result<Page, BuilderValidationError> {
        self.validate()?;

        let tab = self
            .tab
            .ok_or(BuilderValidationError::missing(RequiredField::Tab))?;
        let table = self
            .table
            .ok_or(BuilderValidationError::missing(RequiredField::Table))?;
        let status_message = self
            .status_message
            .ok_or(BuilderValidationError::missing(RequiredField::StatusMessage))?;

        debug!(tab = %tab, rows = table.len(), "built page");

        Ok(Page {
            config: PageConfig {
                title: self.title.unwrap_or_else(|| tab.clone()),
                tab,
                filters: self.filters,
                empty_state: self.empty_state,
                custom_script: self.custom_script,
            },
            table,
            pagination: self.pagination,
            status_message,
        })
    }
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The API calls page: a regular page plus summary statistics
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiCallsPage {
    page: Page,
    summary: ApiCallSummary,
}

impl ApiCallsPage {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn summary(&self) -> &ApiCallSummary {
        &self.summary
    }

    pub fn into_parts(
        self,
    ) -> (
        PageConfig,
        TableData,
        Option<Pagination>,
        StatusMessage,
        ApiCallSummary,
    ) {
        let (config, table, pagination, status) = self.page.into_parts();
        (config, table, pagination, status, self.summary)
    }

    pub fn to_value(&self) -> Value {
        let mut value = self.page.to_value();
        value["summary_statistics"] = serde_json::to_value(&self.summary).unwrap_or_default();
        value
    }
}

/// Builder for [`ApiCallsPage`]; the tab is fixed to `api_calls`
#[derive(Clone, Debug)]
pub struct ApiCallsPageBuilder {
    inner: PageBuilder,
    summary: Option<ApiCallSummary>,
}

impl ApiCallsPageBuilder {
    pub const TAB: &'static str = "api_calls";

    pub fn new() -> Self {
        Self {
            inner: PageBuilder::new().tab(Self::TAB),
            summary: None,
        }
    }

    pub fn stage(&self) -> BuildStage {
        self.inner.stage()
    }

    pub fn title<S: Into<String>>(self, title: S) -> Self {
        self.map(|b| b.title(title))
    }

    pub fn filter(self, filter: FilterControl) -> Self {
        self.map(|b| b.filter(filter))
    }

    pub fn empty_state(self, empty_state: EmptyState) -> Self {
        self.map(|b| b.empty_state(empty_state))
    }

    pub fn table(self, table: TableData) -> Self {
        self.map(|b| b.table(table))
    }

    pub fn pagination(self, pagination: Pagination) -> Self {
        self.map(|b| b.pagination(pagination))
    }

    pub fn status_message(self, status: StatusMessage) -> Self {
        self.map(|b| b.status_message(status))
    }

    pub fn custom_script<S: Into<String>>(self, script: S) -> Self {
        self.map(|b| b.custom_script(script))
    }

    pub fn summary_statistics(mut self, summary: ApiCallSummary) -> Self {
        self.summary = Some(summary);
        self.map(PageBuilder::touch)
    }

    fn map(mut self, f: impl FnOnce(PageBuilder) -> PageBuilder) -> Self {
        self.inner = f(self.inner);
        self
    }

    pub fn validate(&mut self) -> Result<(), BuilderValidationError> {
        self.inner.validate()?;
        if self.summary.is_none() {
            self.inner.stage = BuildStage::Configured;
            return Err(BuilderValidationError::missing(
                RequiredField::SummaryStatistics,
            ));
        }
        Ok(())
    }

    pub fn build(mut self) -> Result<ApiCallsPage, BuilderValidationError> {
        self.validate()?;
        let summary = self.summary.unwrap_or_default();
        Ok(ApiCallsPage {
            page: self.inner.build()?,
            summary,
        })
    }
}

impl Default for ApiCallsPageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
