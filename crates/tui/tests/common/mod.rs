//! Test infrastructure for the TUI flow tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use cadence_core::{
    ApiError, ApiResult, CompletionEntry, FeedEntry, NewTask, Task, TaskApi, TaskId,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

/// Scriptable task service
#[derive(Default)]
pub struct StubApi {
    tasks: Mutex<Vec<Task>>,
    histories: HashMap<TaskId, Vec<CompletionEntry>>,
    failing: HashSet<TaskId>,
    delays: HashMap<TaskId, Duration>,
    list_fails: bool,
    /// Served once, after a delay, by the first `list_tasks` call
    stale_list: Mutex<Option<(Vec<Task>, Duration)>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(mut self, id: u64, title: &str, history: &[&str]) -> Self {
        self.tasks
            .lock()
            .unwrap()
            .push(Task::new(id, title, "2024-01-01T00:00:00Z"));
        let entries = history
            .iter()
            .enumerate()
            .map(|(i, at)| CompletionEntry::new(i as u64 + 1, *at))
            .collect();
        self.histories.insert(TaskId::new(id), entries);
        self
    }

    pub fn failing(mut self, id: u64) -> Self {
        self.failing.insert(TaskId::new(id));
        self
    }

    pub fn delayed(mut self, id: u64, millis: u64) -> Self {
        self.delays.insert(TaskId::new(id), Duration::from_millis(millis));
        self
    }

    /// Make the first list call slow and answer with `tasks`.
    pub fn with_slow_first_list(self, tasks: Vec<Task>, millis: u64) -> Self {
        *self.stale_list.lock().unwrap() = Some((tasks, Duration::from_millis(millis)));
        self
    }

    pub fn with_failing_list(mut self) -> Self {
        self.list_fails = true;
        self
    }

    async fn pause(&self, id: TaskId) {
        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
    }

    fn server_error(path: &str) -> ApiError {
        ApiError::Status {
            url: format!("stub://{}", path),
            status: 500,
        }
    }
}

impl TaskApi for StubApi {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        let stale = self.stale_list.lock().unwrap().take();
        if let Some((tasks, delay)) = stale {
            tokio::time::sleep(delay).await;
            return Ok(tasks);
        }
        if self.list_fails {
            return Err(Self::server_error("tasks/"));
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn get_task(&self, id: TaskId) -> ApiResult<Task> {
        let found = self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned();
        found.ok_or(ApiError::NotFound { task_id: id.get() })
    }

    async fn create_task(&self, _task: &NewTask) -> ApiResult<Task> {
        Err(Self::server_error("tasks/"))
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> ApiResult<Task> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ApiError::NotFound { task_id: id.get() })?;
        task.completed_today = completed;
        Ok(task.clone())
    }

    async fn task_history(&self, id: TaskId) -> ApiResult<Vec<CompletionEntry>> {
        self.pause(id).await;
        if self.failing.contains(&id) {
            return Err(Self::server_error(&format!("tasks/{}/history", id)));
        }
        Ok(self.histories.get(&id).cloned().unwrap_or_default())
    }

    async fn completion_feed(&self) -> ApiResult<Vec<FeedEntry>> {
        Ok(Vec::new())
    }
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

pub fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}
