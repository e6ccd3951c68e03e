//! List command for displaying tasks
//!
//! Implements the `cad list` command to display tasks with filtering options.

use cadence_core::{Task, TaskApi, TaskList, TaskType};
use clap::Args;
use tracing::debug;

use super::parse_task_type;
use crate::error::CliResult;
use crate::output::format_task_table;

/// List tasks with optional filters
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show tasks not completed today
    #[arg(long)]
    pub pending: bool,

    /// Filter by recurrence type
    #[arg(short = 't', long = "type", value_parser = parse_task_type)]
    pub task_type: Option<TaskType>,

    /// Print the tasks as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    /// Whether `task` passes the filters.
    pub fn matches(&self, task: &Task) -> bool {
        if self.pending && task.completed_today {
            return false;
        }
        self.task_type.is_none_or(|wanted| task.task_type == wanted)
    }

    /// Execute the list command.
    ///
    /// Tasks are shown in the order the server returns them.
    pub async fn execute<A: TaskApi>(&self, api: &A) -> CliResult<String> {
        let list = TaskList::fetch(api).await?;
        let tasks: Vec<Task> = list
            .tasks()
            .iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect();
        debug!(total = list.tasks().len(), shown = tasks.len(), "listing tasks");

        if self.json {
            return Ok(serde_json::to_string_pretty(&tasks)?);
        }
        Ok(format_task_table(&tasks))
    }
}
