use super::diagnostics::Diagnostics;
use super::duration_unit::DurationUnit;
use crate::errors::{AppError, AppResult};
use crate::utils::sanitize::clean_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Maximum length (chars) of an operation name.
pub const MAX_NAME_LEN: usize = 120;

/// One step of a work template.
///
/// Worker indices are 1-based. `workers` restricts the operation to an
/// explicit subset (honored in `individual` mode only); `released` lists the
/// workers that leave the run starting with this operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDefinition {
    pub name: String,
    pub duration: f64,
    #[serde(default)]
    pub unit: DurationUnit,
    #[serde(default)]
    pub pause: f64,
    #[serde(default)]
    pub pause_unit: DurationUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<BTreeSet<usize>>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub released: BTreeSet<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,
}

impl OperationDefinition {
    pub fn new(name: &str, duration: f64, unit: DurationUnit) -> Self {
        Self {
            name: name.to_string(),
            duration: clamp_non_negative(duration),
            unit,
            pause: 0.0,
            pause_unit: DurationUnit::Minute,
            workers: None,
            released: BTreeSet::new(),
            confirmation: None,
        }
    }

    pub fn minutes(name: &str, duration: f64) -> Self {
        Self::new(name, duration, DurationUnit::Minute)
    }

    pub fn with_pause(mut self, pause: f64, unit: DurationUnit) -> Self {
        self.pause = clamp_non_negative(pause);
        self.pause_unit = unit;
        self
    }

    pub fn with_workers(mut self, workers: &[usize]) -> Self {
        self.workers = Some(workers.iter().copied().filter(|w| *w > 0).collect());
        self
    }

    pub fn releasing(mut self, workers: &[usize]) -> Self {
        self.released.extend(workers.iter().copied().filter(|w| *w > 0));
        self
    }

    pub fn with_confirmation(mut self, label: &str) -> Self {
        self.confirmation = Some(label.to_string());
        self
    }

    /// Confirmation label for the given 1-based ordinal (defaults to `ordinal * 10`).
    pub fn confirmation_label(&self, ordinal: usize) -> String {
        match &self.confirmation {
            Some(c) if !c.trim().is_empty() => c.trim().to_string(),
            _ => (ordinal * 10).to_string(),
        }
    }
}

fn clamp_non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Raw operation as found in a plan file or a stored template.
/// Every field is accepted as-is and normalized afterwards.
#[derive(Debug, Default, Deserialize)]
pub struct OperationInput {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub duration: Value,
    #[serde(default)]
    pub unit: Value,
    #[serde(default)]
    pub pause: Value,
    #[serde(default)]
    pub pause_unit: Value,
    #[serde(default)]
    pub workers: Value,
    #[serde(default)]
    pub released: Value,
    #[serde(default)]
    pub confirmation: Value,
}

impl OperationInput {
    /// Clamp and default every field. Never fails; findings go to `diags`.
    pub fn normalize(self, ordinal: usize, diags: &mut Diagnostics) -> OperationDefinition {
        let target = format!("operation #{ordinal}");

        let name = match &self.name {
            Value::String(s) => clean_text(s, MAX_NAME_LEN),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        let name = if name.is_empty() {
            diags.push(&target, "missing name, using a generated one");
            format!("Operation {ordinal}")
        } else {
            name
        };

        let workers = match &self.workers {
            Value::Null => None,
            v => Some(lenient_indices(v, &target, "workers", diags)),
        };

        let confirmation = match &self.confirmation {
            Value::String(s) if !s.trim().is_empty() => Some(clean_text(s, 32)),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };

        OperationDefinition {
            name,
            duration: lenient_number(&self.duration, &target, "duration", diags),
            unit: lenient_unit(&self.unit, &target, "unit", diags),
            pause: lenient_number(&self.pause, &target, "pause", diags),
            pause_unit: lenient_unit(&self.pause_unit, &target, "pause_unit", diags),
            workers,
            released: lenient_indices(&self.released, &target, "released", diags),
            confirmation,
        }
    }
}

/// Number or numeric string; anything else (or a negative value) becomes 0.
pub fn lenient_number(v: &Value, target: &str, field: &str, diags: &mut Diagnostics) -> f64 {
    let parsed = match v {
        Value::Null => return 0.0,
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return 0.0,
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() && n >= 0.0 => n,
        Some(n) => {
            diags.push(target, format!("{field} {n} clamped to 0"));
            0.0
        }
        None => {
            diags.push(target, format!("{field} is not a number ({v}), using 0"));
            0.0
        }
    }
}

fn lenient_unit(v: &Value, target: &str, field: &str, diags: &mut Diagnostics) -> DurationUnit {
    match v {
        Value::Null => DurationUnit::Minute,
        Value::String(s) => DurationUnit::from_str_opt(s).unwrap_or_else(|| {
            diags.push(target, format!("unknown {field} '{s}', using minutes"));
            DurationUnit::Minute
        }),
        other => {
            diags.push(target, format!("unknown {field} {other}, using minutes"));
            DurationUnit::Minute
        }
    }
}

fn lenient_indices(v: &Value, target: &str, field: &str, diags: &mut Diagnostics) -> BTreeSet<usize> {
    let mut out = BTreeSet::new();
    let Value::Array(items) = v else {
        if !v.is_null() {
            diags.push(target, format!("{field} must be a list of worker numbers"));
        }
        return out;
    };

    for item in items {
        let n = match item {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        match n {
            Some(n) if n > 0 => {
                out.insert(n as usize);
            }
            _ => diags.push(target, format!("ignored invalid worker {item} in {field}")),
        }
    }
    out
}

/// Parse a plan: either a JSON array of operations or `{ "operations": [...] }`.
/// Entries that are not objects are skipped with a diagnostic.
pub fn parse_plan(json: &str, diags: &mut Diagnostics) -> AppResult<Vec<OperationDefinition>> {
    let root: Value = serde_json::from_str(json)?;

    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("operations") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AppError::InvalidPlan(
                    "expected an array or an object with an 'operations' array".into(),
                ));
            }
        },
        _ => {
            return Err(AppError::InvalidPlan(
                "expected an array of operations".into(),
            ));
        }
    };

    let mut ops = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let ordinal = ops.len() + 1;
        if !item.is_object() {
            diags.push(format!("plan entry {}", i + 1), "not an object, skipped");
            continue;
        }
        match serde_json::from_value::<OperationInput>(item) {
            Ok(input) => ops.push(input.normalize(ordinal, diags)),
            Err(e) => diags.push(format!("plan entry {}", i + 1), format!("skipped: {e}")),
        }
    }

    Ok(ops)
}
