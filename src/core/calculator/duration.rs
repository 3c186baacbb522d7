//! Duration resolver: raw operation values → clock advance + displayed value.

use crate::models::distribution_mode::DistributionMode;
use crate::models::duration_unit::DurationUnit;
use crate::utils::time::minutes_to_duration;
use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDuration {
    /// How far the scheduling clock moves.
    pub elapsed: Duration,
    /// Value shown/exported, expressed in `unit`.
    pub display: f64,
    pub unit: DurationUnit,
}

impl ResolvedDuration {
    /// Displayed value converted to minutes.
    pub fn display_minutes(&self) -> f64 {
        self.unit.to_minutes(self.display)
    }
}

fn sanitize(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
}

/// Effective duration of one operation.
///
/// - `total`: split evenly over the `workers` assigned to the operation
/// - `per_worker`: every worker takes the full value
/// - `individual`: no clock advance, the value is only carried for display
pub fn resolve_duration(
    raw: f64,
    unit: DurationUnit,
    workers: usize,
    mode: DistributionMode,
) -> ResolvedDuration {
    let raw = sanitize(raw);
    let workers = workers.max(1);

    let display = match mode {
        DistributionMode::Total if workers > 1 => raw / workers as f64,
        _ => raw,
    };

    let elapsed = match mode {
        DistributionMode::Individual => Duration::zero(),
        _ => minutes_to_duration(unit.to_minutes(display)),
    };

    ResolvedDuration {
        elapsed,
        display,
        unit,
    }
}

/// Pre-operation pause. Pauses are never split; `individual` mode keeps the
/// nominal value but does not move the clock.
pub fn resolve_pause(raw: f64, unit: DurationUnit, mode: DistributionMode) -> ResolvedDuration {
    let raw = sanitize(raw);
    let elapsed = match mode {
        DistributionMode::Individual => Duration::zero(),
        _ => minutes_to_duration(unit.to_minutes(raw)),
    };

    ResolvedDuration {
        elapsed,
        display: raw,
        unit,
    }
}
