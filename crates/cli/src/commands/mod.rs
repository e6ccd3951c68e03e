//! CLI commands for Cadence
//!
//! This module contains all subcommand implementations for the `cad` CLI.
//! Commands talk to the task service through any [`TaskApi`] and return
//! the text to print.

pub mod add;
pub mod calendar;
pub mod done;
pub mod history;
pub mod list;
pub mod overview;
pub mod show;

pub use add::AddCommand;
pub use calendar::CalendarCommand;
pub use done::{DoneCommand, UndoCommand};
pub use history::HistoryCommand;
pub use list::ListCommand;
pub use overview::OverviewCommand;
pub use show::ShowCommand;

use std::fmt;

use cadence_core::{TaskApi, TaskType};
use chrono::{DateTime, TimeZone};
use clap::Subcommand;

use crate::error::CliResult;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tasks and whether they are done today
    List(ListCommand),
    /// Create a new task
    Add(AddCommand),
    /// Mark a task as completed today
    Done(DoneCommand),
    /// Clear today's completion of a task
    Undo(UndoCommand),
    /// Show a task with its statistics and history
    Show(ShowCommand),
    /// Show a task's completion calendar for one month
    Calendar(CalendarCommand),
    /// Show the completion history of every task
    Overview(OverviewCommand),
    /// Show recent completions across all tasks
    History(HistoryCommand),
}

impl Command {
    /// Execute the command against `api`.
    ///
    /// `now` fixes the current instant and the timezone days are grouped in.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the command's request fails or its input is
    /// rejected before sending.
    pub async fn execute<A, Tz>(&self, api: &A, now: &DateTime<Tz>) -> CliResult<String>
    where
        A: TaskApi,
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            Command::List(cmd) => cmd.execute(api).await,
            Command::Add(cmd) => Ok(cmd.execute(api).await?.to_string()),
            Command::Done(cmd) => Ok(cmd.execute(api).await?.to_string()),
            Command::Undo(cmd) => Ok(cmd.execute(api).await?.to_string()),
            Command::Show(cmd) => cmd.execute(api, now).await,
            Command::Calendar(cmd) => cmd.execute(api, now).await,
            Command::Overview(cmd) => cmd.execute(api, now).await,
            Command::History(cmd) => cmd.execute(api, now).await,
        }
    }
}

/// Parse a task type argument
pub(crate) fn parse_task_type(s: &str) -> Result<TaskType, String> {
    s.parse::<TaskType>().map_err(|e| e.to_string())
}
