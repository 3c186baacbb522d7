use serde::{Deserialize, Serialize};

/// Longest allowed lunch window; a window never extends past midnight.
pub const MINUTES_PER_DAY: u32 = 1440;

/// A fixed daily lunch interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchWindow {
    pub hour: u32,
    pub minute: u32,
    /// Minutes
    pub duration: u32,
}

impl LunchWindow {
    /// Out-of-range parts are clamped rather than rejected.
    pub fn new(hour: i64, minute: i64, duration: i64) -> Self {
        let hour = hour.clamp(0, 23) as u32;
        let minute = minute.clamp(0, 59) as u32;
        let start = hour * 60 + minute;
        // keep the window inside the day: end <= 23:59
        let max = (MINUTES_PER_DAY - 1).saturating_sub(start);
        let duration = duration.clamp(0, max as i64) as u32;
        Self {
            hour,
            minute,
            duration,
        }
    }

    /// Re-apply the clamping rules (used on values read from config/history).
    pub fn normalized(&self) -> Self {
        Self::new(self.hour as i64, self.minute as i64, self.duration as i64)
    }

    pub fn start_minutes(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn end_minutes(&self) -> u32 {
        self.start_minutes() + self.duration
    }

    /// Parse `HH:MM+MIN` (start and duration) or `HH:MM-HH:MM` (start and end).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Some((start, minutes)) = s.split_once('+') {
            let (h, m) = parse_hhmm(start)?;
            let d = minutes.trim().parse::<i64>().ok()?;
            return Some(Self::new(h, m, d));
        }

        let (start, end) = s.split_once('-')?;
        let (h1, m1) = parse_hhmm(start)?;
        let (h2, m2) = parse_hhmm(end)?;
        let d = (h2 * 60 + m2) - (h1 * 60 + m1);
        if d < 0 {
            return None;
        }
        Some(Self::new(h1, m1, d))
    }

    /// "12:00-13:00"
    pub fn label(&self) -> String {
        let end = self.end_minutes();
        format!(
            "{:02}:{:02}-{:02}:{:02}",
            self.hour,
            self.minute,
            end / 60,
            end % 60
        )
    }
}

impl Default for LunchWindow {
    fn default() -> Self {
        Self::new(12, 0, 60)
    }
}

fn parse_hhmm(s: &str) -> Option<(i64, i64)> {
    let (h, m) = s.trim().split_once(':')?;
    let h = h.trim().parse::<i64>().ok()?;
    let m = m.trim().parse::<i64>().ok()?;
    if !(0..24).contains(&h) || !(0..60).contains(&m) {
        return None;
    }
    Some((h, m))
}
