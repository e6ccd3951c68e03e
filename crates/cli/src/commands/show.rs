//! Show command for a single task
//!
//! Implements `cad show`: task fields, completion statistics and recent
//! history. The task and its history are fetched concurrently.

use std::fmt;

use cadence_core::{TaskApi, TaskDetail};
use chrono::{DateTime, TimeZone};
use clap::Args;

use crate::error::CliResult;
use crate::output::format_task_detail;

/// Show a task with its statistics and history
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Task ID to show
    #[arg(required = true)]
    pub id: String,

    /// Maximum number of history entries to print
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,
}

impl ShowCommand {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Fails as a whole if either the task or its history cannot be loaded.
    pub async fn execute<A, Tz>(&self, api: &A, now: &DateTime<Tz>) -> CliResult<String>
    where
        A: TaskApi,
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let detail = TaskDetail::load(api, &self.id, now).await?;
        Ok(format_task_detail(&detail, &now.timezone(), self.limit))
    }
}
