//! Test infrastructure for integration tests
//!
//! Provides an in-memory task service so commands can be executed end to
//! end without a network. Each test builds its own instance.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use cadence_core::{
    ApiError, ApiResult, CompletionEntry, FeedEntry, NewTask, Task, TaskApi, TaskId, Timestamp,
};
use chrono::{DateTime, TimeZone, Utc};

/// Fixed "now" used by every command test: Wednesday 2024-02-14 12:00 UTC
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 14, 12, 0, 0).unwrap()
}

/// In-memory task service
#[derive(Default)]
pub struct MemoryApi {
    tasks: Mutex<Vec<Task>>,
    histories: Mutex<HashMap<TaskId, Vec<CompletionEntry>>>,
    broken_histories: HashSet<TaskId>,
    requests: AtomicUsize,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task created at `created_at` with completions at `history`.
    pub fn with_task(self, id: u64, title: &str, created_at: &str, history: &[&str]) -> Self {
        self.tasks
            .lock()
            .unwrap()
            .push(Task::new(id, title, created_at));
        let entries = history
            .iter()
            .enumerate()
            .map(|(i, at)| CompletionEntry::new(id * 100 + i as u64, *at))
            .collect();
        self.histories
            .lock()
            .unwrap()
            .insert(TaskId::new(id), entries);
        self
    }

    /// Make history requests for `id` fail with a server error.
    pub fn with_broken_history(mut self, id: u64) -> Self {
        self.broken_histories.insert(TaskId::new(id));
        self
    }

    /// Number of requests served.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn task(&self, id: u64) -> Option<Task> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == TaskId::new(id))
            .cloned()
    }

    fn count(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

impl TaskApi for MemoryApi {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        self.count();
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn get_task(&self, id: TaskId) -> ApiResult<Task> {
        self.count();
        self.task(id.get())
            .ok_or(ApiError::NotFound { task_id: id.get() })
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        self.count();
        let mut tasks = self.tasks.lock().unwrap();
        let id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        let created = Task::new(id, task.title.clone(), Timestamp::from(now()))
            .with_description(task.description.clone())
            .with_type(task.task_type);
        tasks.push(created.clone());
        Ok(created)
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> ApiResult<Task> {
        self.count();
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ApiError::NotFound { task_id: id.get() })?;
        task.completed_today = completed;
        Ok(task.clone())
    }

    async fn task_history(&self, id: TaskId) -> ApiResult<Vec<CompletionEntry>> {
        self.count();
        if self.broken_histories.contains(&id) {
            return Err(ApiError::Status {
                url: format!("memory://tasks/{}/history", id),
                status: 503,
            });
        }
        Ok(self
            .histories
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn completion_feed(&self) -> ApiResult<Vec<FeedEntry>> {
        self.count();
        let tasks = self.tasks.lock().unwrap().clone();
        let histories = self.histories.lock().unwrap();
        Ok(tasks
            .iter()
            .flat_map(|task| {
                histories
                    .get(&task.id)
                    .into_iter()
                    .flatten()
                    .map(move |entry| FeedEntry {
                        id: entry.id,
                        completed_at: entry.completed_at.clone(),
                        task_id: Some(task.id),
                        task_title: task.title.clone(),
                        task_description: task.description.clone(),
                    })
            })
            .collect())
    }
}
