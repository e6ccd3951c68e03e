//! Single-resource views: task list, task detail and the completion feed.
//!
//! Unlike the history overview, these views fail as a whole: any transport
//! error becomes one user-visible message.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, TimeZone};
use tracing::{debug, info};

use crate::client::TaskApi;
use crate::daykey::{DayKey, day_keys};
use crate::error::{ApiError, ApiResult};
use crate::grid::{MonthGrid, YearMonth, build_month_grid};
use crate::models::{CompletionEntry, FeedEntry, NewTask, Task, TaskId, sort_newest_first};
use crate::stats::{CompletionStats, compute_stats};

/// Lifecycle of a fetched resource as seen by a view.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    /// Fold a fetch result into a view state.
    pub fn from_result(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => LoadState::Failed(err.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A task with its full history and statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDetail {
    pub task: Task,
    /// Completion entries, newest first.
    pub history: Vec<CompletionEntry>,
    pub stats: CompletionStats,
}

impl TaskDetail {
    /// Load a task by its user-supplied identifier.
    ///
    /// The task and its history are fetched concurrently; either failing
    /// fails the whole view.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidTaskId` without issuing any request when
    /// `raw_id` is not a positive integer, or the first transport error.
    pub async fn load<A, Tz>(api: &A, raw_id: &str, now: &DateTime<Tz>) -> ApiResult<Self>
    where
        A: TaskApi,
        Tz: TimeZone,
    {
        let id = TaskId::parse(raw_id)?;
        debug!(task_id = %id, "loading task detail");
        let (task, mut history) = futures::try_join!(api.get_task(id), api.task_history(id))?;
        let stats = compute_stats(&task, &history, now);
        sort_newest_first(&mut history);
        Ok(Self {
            task,
            history,
            stats,
        })
    }

    /// Days on which the task was completed, in `tz`.
    pub fn completed_days<Tz: TimeZone>(&self, tz: &Tz) -> HashSet<DayKey> {
        day_keys(&self.history, tz)
    }

    /// Month grid for this task's history.
    pub fn grid<Tz: TimeZone>(&self, month: YearMonth, tz: &Tz, today: NaiveDate) -> MonthGrid {
        build_month_grid(month, &self.completed_days(tz), today)
    }
}

/// Load the global completion feed, newest first.
pub async fn load_feed<A: TaskApi>(api: &A) -> ApiResult<Vec<FeedEntry>> {
    let mut entries = api.completion_feed().await?;
    sort_newest_first(&mut entries);
    Ok(entries)
}

/// Local read-through copy of the server's task list.
///
/// The list has no authority of its own: mutations go to the server and
/// the local copy is only ever replaced by what the server returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Fetch the full list from the server.
    pub async fn fetch<A: TaskApi>(api: &A) -> ApiResult<Self> {
        Ok(Self::new(api.list_tasks().await?))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace the local copy of a task with the server's version.
    ///
    /// Returns `false` if the task is not in the list.
    pub fn replace(&mut self, updated: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Flip today's completion on the server and adopt its answer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the task is not in the local list,
    /// or whatever the server call fails with. The local copy is left
    /// untouched on error.
    pub async fn toggle_completion<A: TaskApi>(&mut self, api: &A, id: TaskId) -> ApiResult<&Task> {
        let completed = self
            .get(id)
            .map(|t| !t.completed_today)
            .ok_or(ApiError::NotFound { task_id: id.get() })?;
        let updated = api.set_completed(id, completed).await?;
        info!(task_id = %id, completed = updated.completed_today, "task completion updated");
        self.replace(updated);
        self.get(id).ok_or(ApiError::NotFound { task_id: id.get() })
    }

    /// Create a task on the server and append the server's copy.
    pub async fn create<A: TaskApi>(&mut self, api: &A, task: &NewTask) -> ApiResult<&Task> {
        let created = api.create_task(task).await?;
        info!(task_id = %created.id, title = %created.title, "task created");
        self.tasks.push(created);
        self.tasks.last().ok_or(ApiError::Validation {
            message: "created task missing from list".to_string(),
        })
    }
}
