mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, ValueEnum};
use tracing::{debug, warn};

use config::DashboardConfig;
use queuelens_logs::LogReader;
use queuelens_pages::views::{
    api_calls_page, error_logs_page, matches_page, queue_logs_page, queue_page, ratings_page,
};
use queuelens_pages::{DashboardPage, PageError, ViewParams, recover};
use queuelens_store::{MemoryStore, StoreError};
use queuelens_types::PeriodFilter;

/// Queuelens - dashboard pages over a queue processor's logs and records
#[derive(Parser, Debug)]
#[command(name = "queuelens")]
#[command(author, version, about, long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Page to render
    #[arg(value_enum, value_name = "PAGE")]
    view: View,

    /// Time period (hour, day, week, month, all)
    #[arg(long, default_value = "all")]
    period: String,

    /// Page number, clamped to the available pages
    #[arg(long = "page", default_value_t = 1)]
    page_number: i64,

    /// Rows per page (defaults to the config file's default_limit)
    #[arg(long)]
    limit: Option<usize>,

    /// Level, event type, queue tab or match outcome, depending on the page
    #[arg(long, default_value = "all")]
    filter: String,

    /// Case-insensitive search text
    #[arg(long, default_value = "")]
    search: String,

    /// Config file (defaults to ./queuelens.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the error log path
    #[arg(long, value_name = "FILE")]
    error_log: Option<PathBuf>,

    /// Override the queue processor log path
    #[arg(long, value_name = "FILE")]
    queue_log: Option<PathBuf>,

    /// Override the JSON data file
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Number of log lines to read from the end of each file
    #[arg(long)]
    tail_lines: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum View {
    ErrorLogs,
    QueueLogs,
    Queue,
    Ratings,
    Matches,
    ApiCalls,
}

impl View {
    fn tab(&self) -> &'static str {
        match self {
            Self::ErrorLogs => "error_logs",
            Self::QueueLogs => "queue_logs",
            Self::Queue => "queue",
            Self::Ratings => "ratings",
            Self::Matches => "matches",
            Self::ApiCalls => "api_calls",
        }
    }
}

impl Args {
    /// Command-line flags take precedence over the config file
    fn merge(&self, mut config: DashboardConfig) -> DashboardConfig {
        if let Some(path) = &self.error_log {
            config.error_log = path.clone();
        }
        if let Some(path) = &self.queue_log {
            config.queue_log = path.clone();
        }
        if let Some(path) = &self.data {
            config.data_file = Some(path.clone());
        }
        if let Some(lines) = self.tail_lines {
            config.tail_lines = lines;
        }
        if let Some(limit) = self.limit {
            config.default_limit = limit;
        }
        config
    }

    fn view_params(&self, config: &DashboardConfig) -> ViewParams {
        ViewParams {
            page: self.page_number,
            limit: config.default_limit,
            period: PeriodFilter::from(self.period.as_str()),
            filter: self.filter.clone(),
            search: self.search.clone(),
        }
    }
}

fn open_store(config: &DashboardConfig) -> Result<MemoryStore, StoreError> {
    match &config.data_file {
        Some(path) => MemoryStore::load_json(path),
        None => {
            warn!("no data file configured, store-backed pages will be empty");
            Ok(MemoryStore::new())
        }
    }
}

fn render(
    view: View,
    config: &DashboardConfig,
    params: &ViewParams,
    now: NaiveDateTime,
) -> Result<DashboardPage, PageError> {
    let reader = LogReader::new(config.tail_lines);

    let page = match view {
        View::ErrorLogs => {
            DashboardPage::ErrorLogs(error_logs_page(&reader, &config.error_log, params, now)?)
        }
        View::QueueLogs => {
            DashboardPage::QueueLogs(queue_logs_page(&reader, &config.queue_log, params, now)?)
        }
        View::Queue => DashboardPage::Standard(queue_page(&open_store(config)?, params)?),
        View::Ratings => DashboardPage::Standard(ratings_page(&open_store(config)?, params, now)?),
        View::Matches => DashboardPage::Standard(matches_page(&open_store(config)?, params, now)?),
        View::ApiCalls => DashboardPage::ApiCalls(api_calls_page(&open_store(config)?, params, now)?),
    };
    Ok(page)
}

fn run(args: Args) -> Result<()> {
    let config = args.merge(DashboardConfig::load(args.config.as_deref())?);
    let params = args.view_params(&config);
    debug!(?config, ?params, "rendering {}", args.view.tab());

    // Log timestamps carry no zone, so compare against local wall-clock time
    let now = Local::now().naive_local();

    let page = match render(args.view, &config, &params, now) {
        Ok(page) => page,
        Err(e) => DashboardPage::Standard(recover(args.view.tab(), &e)),
    };

    let json = serde_json::to_string_pretty(&page.to_value()).context("failed to encode page")?;
    println!("{}", json);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run(args);

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}
