use serde::{Deserialize, Serialize};

/// How an operation's duration and workers are divided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMode {
    /// Duration shared by the workforce: each worker gets `raw / N`.
    #[default]
    Total,
    /// Every worker performs the full duration in parallel.
    PerWorker,
    /// Explicit worker subsets; placement is resolved per worker in the sheet.
    Individual,
}

impl DistributionMode {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "total" => Some(Self::Total),
            "per_worker" | "perworker" | "worker" => Some(Self::PerWorker),
            "individual" => Some(Self::Individual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionMode::Total => "total",
            DistributionMode::PerWorker => "per_worker",
            DistributionMode::Individual => "individual",
        }
    }

    pub fn is_individual(&self) -> bool {
        matches!(self, DistributionMode::Individual)
    }
}
