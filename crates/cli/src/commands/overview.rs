//! Overview command
//!
//! Loads every task's history concurrently. A task whose history fails
//! is reported by name while the others still print.

use std::fmt;

use cadence_core::{HistoryOverview, TaskApi};
use chrono::{DateTime, TimeZone};
use clap::Args;

use crate::error::CliResult;
use crate::output::format_overview;

/// Show the completion history of every task
#[derive(Debug, Args)]
pub struct OverviewCommand {
    /// Maximum number of entries per task
    #[arg(short = 'n', long, default_value_t = 5)]
    pub limit: usize,
}

impl OverviewCommand {
    /// Execute the overview command.
    ///
    /// # Errors
    ///
    /// Only listing the tasks can fail the command; per-task history
    /// failures are part of the output.
    pub async fn execute<A, Tz>(&self, api: &A, now: &DateTime<Tz>) -> CliResult<String>
    where
        A: TaskApi,
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let tasks = api.list_tasks().await?;
        let mut overview = HistoryOverview::new(tasks);
        overview.refresh(api).await;

        let error = overview.error_message();
        Ok(format_overview(
            &overview.cards(),
            error.as_deref(),
            &now.timezone(),
            self.limit,
        ))
    }
}
