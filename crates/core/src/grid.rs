//! Month grid construction for the completion calendar.
//!
//! A grid is plain data: padding cells that align day 1 to its weekday
//! column (weeks start on Sunday), then one cell per day of the month
//! flagged as completed and/or today, plus the month's completion rate.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone};

use crate::daykey::DayKey;

/// Number of columns in a week row.
pub const DAYS_PER_WEEK: usize = 7;

/// Weekday column headers, Sunday first.
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A calendar month, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Build from a year and a 1-based month. Returns `None` for month
    /// numbers outside 1..=12 or years chrono cannot represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The month containing `instant` in its own timezone.
    pub fn of_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::of(instant.date_naive())
    }

    /// Parse `YYYY-MM`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// 1-based month number.
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// 0-based month index (January = 0).
    pub fn month0(self) -> u32 {
        self.0.month0()
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// The month before this one, rolling the year over as needed.
    pub fn pred(self) -> Self {
        self.0.checked_sub_months(Months::new(1)).map_or(self, Self)
    }

    /// The month after this one, rolling the year over as needed.
    pub fn succ(self) -> Self {
        self.0.checked_add_months(Months::new(1)).map_or(self, Self)
    }

    /// Number of days, as the day before the first of the next month.
    pub fn days_in_month(self) -> u32 {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .map_or(0, |last| last.day())
    }

    /// Weekday column of day 1 (0 = Sunday).
    pub fn leading_padding(self) -> usize {
        self.0.weekday().num_days_from_sunday() as usize
    }

    /// The date of `day` within this month, if it exists.
    pub fn day(self, day: u32) -> Option<NaiveDate> {
        self.0.with_day(day)
    }

    /// "February 2024"
    pub fn label(self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthGridCell {
    /// Blank cell before day 1 or after the last day.
    Padding,
    /// A real day of the month.
    Day {
        day: u32,
        completed: bool,
        today: bool,
    },
}

impl MonthGridCell {
    /// Day number, `None` for padding.
    pub fn day(&self) -> Option<u32> {
        match self {
            MonthGridCell::Padding => None,
            MonthGridCell::Day { day, .. } => Some(*day),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, MonthGridCell::Day { completed: true, .. })
    }

    pub fn is_today(&self) -> bool {
        matches!(self, MonthGridCell::Day { today: true, .. })
    }

    pub fn is_padding(&self) -> bool {
        matches!(self, MonthGridCell::Padding)
    }
}

/// Rendering-ready grid for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: YearMonth,
    /// Leading padding followed by one cell per day.
    pub cells: Vec<MonthGridCell>,
    pub completed_count: u32,
    pub total_days: u32,
    pub completion_percent: u32,
}

impl MonthGrid {
    /// Cells split into week rows of exactly seven, with trailing padding
    /// added to the last row.
    pub fn weeks(&self) -> Vec<[MonthGridCell; DAYS_PER_WEEK]> {
        self.cells
            .chunks(DAYS_PER_WEEK)
            .map(|chunk| {
                let mut row = [MonthGridCell::Padding; DAYS_PER_WEEK];
                row[..chunk.len()].copy_from_slice(chunk);
                row
            })
            .collect()
    }

    /// Number of leading padding cells.
    pub fn leading_padding(&self) -> usize {
        self.cells.iter().take_while(|cell| cell.is_padding()).count()
    }

    /// "2 of 29 days completed"
    pub fn summary(&self) -> String {
        format!(
            "{} of {} days completed",
            self.completed_count, self.total_days
        )
    }
}

/// Round `part / whole * 100` half-up, as an integer percentage.
///
/// Returns 0 when `whole` is 0.
pub fn percent_rounded(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part);
    let whole = u64::from(whole);
    ((part * 200 + whole) / (whole * 2)) as u32
}

/// Build the grid for `month`, marking days in `completed` and `today`.
///
/// `today` is the caller's local calendar date; pass it explicitly so the
/// grid is a pure function of its inputs.
pub fn build_month_grid(
    month: YearMonth,
    completed: &HashSet<DayKey>,
    today: NaiveDate,
) -> MonthGrid {
    let total_days = month.days_in_month();
    let padding = month.leading_padding();

    let mut cells = Vec::with_capacity(padding + total_days as usize);
    cells.extend(std::iter::repeat_n(MonthGridCell::Padding, padding));

    let mut completed_count = 0;
    for day in 1..=total_days {
        let Some(date) = month.day(day) else {
            continue;
        };
        let is_completed = completed.contains(&DayKey::from_date(date));
        if is_completed {
            completed_count += 1;
        }
        cells.push(MonthGridCell::Day {
            day,
            completed: is_completed,
            today: date == today,
        });
    }

    MonthGrid {
        month,
        cells,
        completed_count,
        total_days,
        completion_percent: percent_rounded(completed_count, total_days),
    }
}
