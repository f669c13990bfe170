use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use queuelens_logs::DEFAULT_TAIL_LINES;
use queuelens_pages::DEFAULT_PAGE_LIMIT;

/// Settings read from `queuelens.toml`; every field is optional
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Application error log
    pub error_log: PathBuf,

    /// Queue processor log
    pub queue_log: PathBuf,

    /// Lines kept from the end of each log
    pub tail_lines: usize,

    /// Rows per page
    pub default_limit: usize,

    /// JSON fixture with ratings, matches, queue items and API calls
    pub data_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            error_log: PathBuf::from("logs/error.log"),
            queue_log: PathBuf::from("logs/queue_processor.log"),
            tail_lines: DEFAULT_TAIL_LINES,
            default_limit: DEFAULT_PAGE_LIMIT,
            data_file: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Load `path` if given, otherwise `queuelens.toml` when present,
    /// otherwise defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new("queuelens.toml");
                if local.is_file() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
