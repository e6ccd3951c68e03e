//! Calendar command
//!
//! Renders one month of a task's completions as a Sunday-first grid.

use std::fmt;

use cadence_core::{TaskApi, TaskDetail, YearMonth};
use chrono::{DateTime, TimeZone};
use clap::Args;
use tracing::debug;

use crate::error::CliResult;
use crate::output::format_month_grid;

/// Show a task's completion calendar
#[derive(Debug, Args)]
pub struct CalendarCommand {
    /// Task ID to show
    #[arg(required = true)]
    pub id: String,

    /// Month to show as YYYY-MM (defaults to the current month)
    #[arg(short, long, value_parser = parse_month)]
    pub month: Option<YearMonth>,
}

fn parse_month(s: &str) -> Result<YearMonth, String> {
    YearMonth::parse(s).ok_or_else(|| format!("invalid month '{}'. Expected YYYY-MM", s))
}

impl CalendarCommand {
    /// Execute the calendar command.
    pub async fn execute<A, Tz>(&self, api: &A, now: &DateTime<Tz>) -> CliResult<String>
    where
        A: TaskApi,
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let detail = TaskDetail::load(api, &self.id, now).await?;
        let month = self.month.unwrap_or_else(|| YearMonth::of_instant(now));
        debug!(task_id = %detail.task.id, %month, "rendering calendar");

        let grid = detail.grid(month, &now.timezone(), now.date_naive());
        Ok(format!(
            "{} (#{})\n\n{}",
            detail.task.title,
            detail.task.id,
            format_month_grid(&grid)
        ))
    }
}
