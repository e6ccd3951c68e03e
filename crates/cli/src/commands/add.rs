//! Add command for creating new tasks
//!
//! Implements the `cad add` command.

use std::fmt;

use cadence_core::{NewTask, Task, TaskApi, TaskType};
use clap::Args;
use tracing::info;

use super::parse_task_type;
use crate::error::CliResult;

/// Create a new task
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Task title
    #[arg(required = true)]
    pub title: String,

    /// Task description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Recurrence type (daily, weekly, monthly, yearly)
    #[arg(short = 't', long = "type", value_parser = parse_task_type, default_value = "daily")]
    pub task_type: TaskType,
}

/// The task as created by the server
#[derive(Debug)]
pub struct AddResult {
    pub task: Task,
}

impl fmt::Display for AddResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Created task {}: {} ({})",
            self.task.id, self.task.title, self.task.task_type
        )
    }
}

impl AddCommand {
    /// Build the payload sent to the server.
    pub fn payload(&self) -> NewTask {
        let payload = NewTask::new(self.title.trim(), self.task_type);
        match &self.description {
            Some(description) => payload.with_description(description.trim()),
            None => payload,
        }
    }

    /// Execute the add command.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` without contacting the server if the
    /// title is blank or too long.
    pub async fn execute<A: TaskApi>(&self, api: &A) -> CliResult<AddResult> {
        let payload = self.payload();
        payload.validate()?;

        let task = api.create_task(&payload).await?;
        info!(task_id = %task.id, "created task");
        Ok(AddResult { task })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_trims_fields() {
        let cmd = AddCommand {
            title: "  Run  ".to_string(),
            description: Some(" 5k ".to_string()),
            task_type: TaskType::Weekly,
        };
        let payload = cmd.payload();
        assert_eq!(payload.title, "Run");
        assert_eq!(payload.description, "5k");
        assert_eq!(payload.task_type, TaskType::Weekly);
    }

    #[test]
    fn test_add_result_display() {
        let result = AddResult {
            task: Task::new(4, "Run", "2024-01-01T00:00:00Z"),
        };
        assert_eq!(result.to_string(), "Created task 4: Run (daily)");
    }
}
