//! Completion statistics for a single task.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::grid::YearMonth;
use crate::models::{CompletionEntry, Task};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Lifetime and current-month completion rates, both in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompletionStats {
    /// Completions per day elapsed since the task was created.
    pub lifetime_percent: f64,
    /// Completions in the current month per day of that month.
    pub monthly_percent: f64,
}

impl CompletionStats {
    /// Lifetime rate rounded for display.
    pub fn lifetime_rounded(&self) -> u32 {
        display_percent(self.lifetime_percent)
    }

    /// Monthly rate rounded for display.
    pub fn monthly_rounded(&self) -> u32 {
        display_percent(self.monthly_percent)
    }
}

/// Compute a task's completion statistics as of `now`.
///
/// The month for `monthly_percent` and the grouping of each completion are
/// taken in `now`'s timezone. A `created_at` that does not parse yields a
/// lifetime rate of 0.
pub fn compute_stats<Tz: TimeZone>(
    task: &Task,
    history: &[CompletionEntry],
    now: &DateTime<Tz>,
) -> CompletionStats {
    let lifetime = match task.created_at.parse() {
        Some(created) => {
            let elapsed = now.with_timezone(&Utc) - created;
            let days = (elapsed.num_milliseconds() as f64 / MILLIS_PER_DAY)
                .ceil()
                .max(1.0);
            ratio_percent(history.len() as f64, days)
        }
        None => 0.0,
    };

    let month = YearMonth::of_instant(now);
    let tz = now.timezone();
    let in_month = history
        .iter()
        .filter_map(|entry| entry.completed_at.parse())
        .map(|instant| instant.with_timezone(&tz).date_naive())
        .filter(|date| date.year() == month.year() && date.month() == month.month())
        .count();
    let monthly = ratio_percent(in_month as f64, f64::from(month.days_in_month()));

    CompletionStats {
        lifetime_percent: normalize_percent(lifetime),
        monthly_percent: normalize_percent(monthly),
    }
}

fn ratio_percent(part: f64, whole: f64) -> f64 {
    (part / whole * 100.0).min(100.0)
}

/// Map NaN and infinities to 0 and clamp into `[0, 100]`.
pub fn normalize_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Round a percentage for display after normalizing it.
pub fn display_percent(value: f64) -> u32 {
    normalize_percent(value).round() as u32
}
