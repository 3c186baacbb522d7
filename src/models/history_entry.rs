use super::distribution_mode::DistributionMode;
use super::lunch_window::LunchWindow;
use super::run_config::StartSource;
use super::schedule_row::ScheduleRow;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of one completed scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Row id in the `history` table (not part of the stored body).
    #[serde(skip)]
    pub id: Option<i64>,
    pub created_at: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub start_source: StartSource,
    #[serde(default)]
    pub chain_mode: bool,
    #[serde(default)]
    pub mode: DistributionMode,
    pub workers: usize,
    #[serde(default)]
    pub lunch: Vec<LunchWindow>,
    pub rows: Vec<ScheduleRow>,
    #[serde(default)]
    pub report: Vec<String>,
}

impl HistoryEntry {
    /// Chained entries continue from the previous entry's last end time.
    pub fn is_chained(&self) -> bool {
        self.start_source == StartSource::Chained
    }

    /// Number of distinct operations that produced rows.
    pub fn operation_count(&self) -> usize {
        let mut n = 0;
        let mut last = None;
        for r in &self.rows {
            if last != Some(r.operation) {
                n += 1;
                last = Some(r.operation);
            }
        }
        n
    }
}
