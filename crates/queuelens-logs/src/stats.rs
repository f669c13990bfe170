use serde::Serialize;

use queuelens_types::{EventCategory, LogLevel, LogRecord};

use crate::classify::has_checkmark;

/// Keyword counters shown on the queue log page.
///
/// Each counter has its own trigger and is independent of the
/// [`EventCategory`] assigned to the same message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub probes: usize,
    pub recoveries: usize,
    pub retries: usize,
    pub resolved: usize,
}

impl QueueStats {
    pub fn record(&mut self, message: &str) {
        let msg = message.to_lowercase();

        if msg.contains("time to check") {
            self.probes += 1;
        }
        if msg.contains("quota restored") {
            self.recoveries += 1;
        }
        if msg.contains("found") && msg.contains("pending videos to retry") {
            self.retries += 1;
        }
        if msg.contains("successfully matched") || has_checkmark(&msg) {
            self.resolved += 1;
        }
    }
}

/// Counts per event category
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub probe: usize,
    pub retry: usize,
    pub success: usize,
    pub error: usize,
    pub recovery: usize,
    pub other: usize,
}

impl CategoryCounts {
    pub fn increment(&mut self, category: EventCategory) {
        *self.slot(category) += 1;
    }

    pub fn get(&self, category: EventCategory) -> usize {
        match category {
            EventCategory::Probe => self.probe,
            EventCategory::Retry => self.retry,
            EventCategory::Success => self.success,
            EventCategory::Error => self.error,
            EventCategory::Recovery => self.recovery,
            EventCategory::Other => self.other,
        }
    }

    pub fn total(&self) -> usize {
        self.probe + self.retry + self.success + self.error + self.recovery + self.other
    }

    fn slot(&mut self, category: EventCategory) -> &mut usize {
        match category {
            EventCategory::Probe => &mut self.probe,
            EventCategory::Retry => &mut self.retry,
            EventCategory::Success => &mut self.success,
            EventCategory::Error => &mut self.error,
            EventCategory::Recovery => &mut self.recovery,
            EventCategory::Other => &mut self.other,
        }
    }
}

/// Counts per log level
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub debug: usize,
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
    pub unknown: usize,
}

impl LevelCounts {
    pub fn increment(&mut self, level: LogLevel) {
        match level {
            LogLevel::Debug => self.debug += 1,
            LogLevel::Info => self.info += 1,
            LogLevel::Warning => self.warning += 1,
            LogLevel::Error => self.error += 1,
            LogLevel::Critical => self.critical += 1,
            LogLevel::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.debug + self.info + self.warning + self.error + self.critical + self.unknown
    }
}

/// Tallies over the records that fall inside the time window
#[derive(Clone, Debug, Default)]
pub struct StatsAggregator {
    queue: QueueStats,
    categories: CategoryCounts,
    levels: LevelCounts,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: &LogRecord, category: EventCategory) {
        self.queue.record(&record.message);
        self.categories.increment(category);
        self.levels.increment(record.severity());
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            queue: self.queue.clone(),
            categories: self.categories.clone(),
            levels: self.levels.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub queue: QueueStats,
    pub categories: CategoryCounts,
    pub levels: LevelCounts,
}
