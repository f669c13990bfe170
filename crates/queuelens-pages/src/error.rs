use std::fmt;
use thiserror::Error;

use queuelens_store::StoreError;

/// Fields a page cannot be built without
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequiredField {
    Tab,
    Table,
    StatusMessage,
    SummaryStatistics,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::Table => "table_data",
            Self::StatusMessage => "status_message",
            Self::SummaryStatistics => "summary_statistics",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("page builder is missing required field: {field}")]
pub struct BuilderValidationError {
    pub field: RequiredField,
}

impl BuilderValidationError {
    pub fn missing(field: RequiredField) -> Self {
        Self { field }
    }
}

/// Why a dashboard page could not be produced
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Builder(#[from] BuilderValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid search filter '{pattern}': {reason}")]
    Filter { pattern: String, reason: String },
}
