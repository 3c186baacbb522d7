use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    #[default]
    Minute,
    Hour,
}

impl DurationUnit {
    /// Recognized spellings only; callers fall back to `Minute`.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "minute" | "minutes" | "min" | "m" => Some(Self::Minute),
            "hour" | "hours" | "h" => Some(Self::Hour),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Minute => "minute",
            DurationUnit::Hour => "hour",
        }
    }

    /// Short label shown in tables and written to the unit column of the sheet.
    pub fn label(&self) -> &'static str {
        match self {
            DurationUnit::Minute => "min",
            DurationUnit::Hour => "h",
        }
    }

    pub fn to_minutes(&self, value: f64) -> f64 {
        match self {
            DurationUnit::Minute => value,
            DurationUnit::Hour => value * 60.0,
        }
    }
}
