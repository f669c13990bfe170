//! Page assembly for queuelens
//!
//! This crate provides pagination, the presentation objects handed to the
//! renderer, validating page builders and the dashboard views built on them.

mod builder;
mod error;
mod paginate;
mod presentation;
pub mod views;

pub use builder::{ApiCallsPage, ApiCallsPageBuilder, BuildStage, Page, PageBuilder};
pub use error::{BuilderValidationError, PageError, RequiredField};
pub use paginate::{Paginated, generate_page_numbers, paginate};
pub use presentation::{
    Column, EmptyState, FilterControl, FilterOption, PageConfig, Pagination, StatusMessage,
    StatusTone, TableData,
};
pub use views::{DEFAULT_PAGE_LIMIT, DashboardPage, ViewParams, recover};

// Re-export types used in our public API
pub use queuelens_types::{ApiCallSummary, PageNumber, PageWindow, PeriodFilter};
