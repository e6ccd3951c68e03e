//! Done and undo commands for today's completion
//!
//! `cad done` records a completion for today; `cad undo` clears it. The
//! server decides what "today" is and its answer is what gets reported.

use std::fmt;

use cadence_core::{ApiResult, Task, TaskApi, TaskId};
use clap::Args;
use tracing::info;

use crate::error::CliResult;

/// Mark a task as completed today
#[derive(Debug, Args)]
pub struct DoneCommand {
    /// Task ID to complete
    #[arg(required = true)]
    pub id: String,
}

/// Clear today's completion of a task
#[derive(Debug, Args)]
pub struct UndoCommand {
    /// Task ID to reset
    #[arg(required = true)]
    pub id: String,
}

/// Outcome of a completion update
#[derive(Debug)]
pub struct CompletionResult {
    /// The server's copy of the task after the update
    pub task: Task,
    /// What was requested
    pub requested: bool,
}

impl fmt::Display for CompletionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let task = &self.task;
        match (self.requested, task.completed_today) {
            (true, true) => write!(f, "Completed task {}: {}", task.id, task.title),
            (false, false) => write!(
                f,
                "Cleared today's completion for task {}: {}",
                task.id, task.title
            ),
            (_, completed) => write!(
                f,
                "Task {} ({}) is {} for today according to the server",
                task.id,
                task.title,
                if completed { "completed" } else { "not completed" }
            ),
        }
    }
}

async fn set_completion<A: TaskApi>(
    api: &A,
    raw_id: &str,
    completed: bool,
) -> ApiResult<CompletionResult> {
    let id = TaskId::parse(raw_id)?;
    let task = api.set_completed(id, completed).await?;
    info!(task_id = %id, requested = completed, completed = task.completed_today, "updated completion");
    Ok(CompletionResult {
        task,
        requested: completed,
    })
}

impl DoneCommand {
    /// Execute the done command.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidTaskId` without contacting the server if
    /// the id is not a positive integer.
    pub async fn execute<A: TaskApi>(&self, api: &A) -> CliResult<CompletionResult> {
        Ok(set_completion(api, &self.id, true).await?)
    }
}

impl UndoCommand {
    /// Execute the undo command.
    pub async fn execute<A: TaskApi>(&self, api: &A) -> CliResult<CompletionResult> {
        Ok(set_completion(api, &self.id, false).await?)
    }
}
