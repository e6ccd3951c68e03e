//! Calendar navigation state.
//!
//! The cursor only knows which month is on screen. It is independent of
//! the data displayed, except that it snaps back to the current month
//! whenever the displayed dataset changes.

use chrono::NaiveDate;

use crate::grid::YearMonth;

/// The month currently displayed by a calendar view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCursor<K = crate::models::TaskId> {
    current: YearMonth,
    dataset: Option<K>,
}

impl<K: PartialEq> MonthCursor<K> {
    /// Start on the month containing `now`.
    pub fn new(now: NaiveDate) -> Self {
        Self {
            current: YearMonth::of(now),
            dataset: None,
        }
    }

    /// The displayed month.
    pub fn current(&self) -> YearMonth {
        self.current
    }

    /// Step back one month.
    pub fn previous_month(&mut self) {
        self.current = self.current.pred();
    }

    /// Step forward one month.
    pub fn next_month(&mut self) {
        self.current = self.current.succ();
    }

    /// Jump to the month containing `now`.
    pub fn today(&mut self, now: NaiveDate) {
        self.current = YearMonth::of(now);
    }

    /// Record which dataset is displayed, resetting to the current month if
    /// it differs from the previous one.
    ///
    /// Returns `true` when a reset happened.
    pub fn follow_dataset(&mut self, dataset: K, now: NaiveDate) -> bool {
        if self.dataset.as_ref() == Some(&dataset) {
            return false;
        }
        self.dataset = Some(dataset);
        self.today(now);
        true
    }

    /// Identity of the displayed dataset, if any.
    pub fn dataset(&self) -> Option<&K> {
        self.dataset.as_ref()
    }
}
