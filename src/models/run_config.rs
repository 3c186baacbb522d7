use super::distribution_mode::DistributionMode;
use super::lunch_window::LunchWindow;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const MIN_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 10;
/// At most two lunch windows per run.
pub const MAX_LUNCH_WINDOWS: usize = 2;

/// Where the run start came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartSource {
    /// Entered by the user.
    #[default]
    Manual,
    /// Continued from the end of the previous chained run.
    Chained,
}

/// Everything the scheduler needs besides the operation list.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub start: NaiveDateTime,
    pub start_source: StartSource,
    pub workers: usize,
    pub mode: DistributionMode,
    pub lunch: Vec<LunchWindow>,
    pub chain_mode: bool,
    pub posting_date: NaiveDate,
    pub worker_names: Vec<String>,
}

impl RunConfig {
    /// One worker, `total` mode, no lunch, posting date = start date.
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            start_source: StartSource::Manual,
            workers: MIN_WORKERS,
            mode: DistributionMode::Total,
            lunch: Vec::new(),
            chain_mode: false,
            posting_date: start.date(),
            worker_names: Vec::new(),
        }
    }

    pub fn with_workers(mut self, workers: i64) -> Self {
        self.workers = clamp_workers(workers);
        self
    }

    pub fn with_mode(mut self, mode: DistributionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_lunch(mut self, window: LunchWindow) -> Self {
        if self.lunch.len() < MAX_LUNCH_WINDOWS {
            self.lunch.push(window.normalized());
        }
        self
    }

    pub fn with_chain_mode(mut self, on: bool) -> Self {
        self.chain_mode = on;
        self
    }

    pub fn with_posting_date(mut self, date: NaiveDate) -> Self {
        self.posting_date = date;
        self
    }

    pub fn with_start_source(mut self, source: StartSource) -> Self {
        self.start_source = source;
        self
    }

    pub fn with_worker_names(mut self, names: Vec<String>) -> Self {
        self.worker_names = names;
        self
    }

    /// Display label of a 1-based worker index.
    pub fn worker_label(&self, worker: usize) -> String {
        self.worker_names
            .get(worker.wrapping_sub(1))
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Worker {worker}"))
    }
}

/// Never zero workers, never more than the form allows.
pub fn clamp_workers(raw: i64) -> usize {
    raw.clamp(MIN_WORKERS as i64, MAX_WORKERS as i64) as usize
}
