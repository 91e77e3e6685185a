//! Adjusting a scheduled arrival by a reported delay.

use chrono::{DateTime, TimeDelta, TimeZone};

/// A scheduled arrival shifted by a signed delay.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment<Tz: TimeZone> {
    pub adjusted: DateTime<Tz>,
    /// Absolute value of the delay.
    pub magnitude: TimeDelta,
    pub is_late: bool,
}

/// Shifts `scheduled` by `delay_seconds` (positive = late, negative =
/// early). A zero delay returns the scheduled time unchanged.
pub fn adjust<Tz: TimeZone>(scheduled: DateTime<Tz>, delay_seconds: i32) -> Adjustment<Tz> {
    let magnitude = TimeDelta::seconds(i64::from(delay_seconds.unsigned_abs()));
    let adjusted = if delay_seconds >= 0 {
        scheduled + magnitude
    } else {
        scheduled - magnitude
    };
    Adjustment {
        adjusted,
        magnitude,
        is_late: delay_seconds > 0,
    }
}

/// Renders a non-negative delta as `H:MM:SS`.
pub fn format_delta(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    format!("{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
}
