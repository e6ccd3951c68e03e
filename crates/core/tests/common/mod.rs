//! Shared test doubles for the core integration tests.
//!
//! `FakeApi` serves canned tasks and histories from memory, can be told to
//! fail or delay individual tasks, and counts how many requests it saw.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cadence_core::{
    ApiError, ApiResult, CompletionEntry, FeedEntry, NewTask, Task, TaskApi, TaskId,
};

#[derive(Default)]
pub struct FakeApi {
    tasks: Mutex<Vec<Task>>,
    histories: HashMap<TaskId, Vec<CompletionEntry>>,
    feed: Vec<FeedEntry>,
    failing: HashSet<TaskId>,
    delays: HashMap<TaskId, Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(self, task: Task) -> Self {
        self.tasks.lock().unwrap().push(task);
        self
    }

    pub fn with_history(mut self, id: u64, entries: Vec<CompletionEntry>) -> Self {
        self.histories.insert(TaskId::new(id), entries);
        self
    }

    pub fn with_feed(mut self, feed: Vec<FeedEntry>) -> Self {
        self.feed = feed;
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

    /// Total number of requests served (successful or not).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of history requests observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn fail(&self, id: TaskId) -> ApiError {
        ApiError::Status {
            url: format!("fake://tasks/{}/history", id),
            status: 500,
        }
    }
}

impl TaskApi for FakeApi {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn get_task(&self, id: TaskId) -> ApiResult<Task> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(ApiError::NotFound { task_id: id.get() })
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        task.validate()?;
        let mut tasks = self.tasks.lock().unwrap();
        let id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        let created = Task::new(id, task.title.clone(), "2024-06-01T12:00:00Z")
            .with_description(task.description.clone())
            .with_type(task.task_type);
        tasks.push(created.clone());
        Ok(created)
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> ApiResult<Task> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ApiError::NotFound { task_id: id.get() })?;
        task.completed_today = completed;
        Ok(task.clone())
    }

    async fn task_history(&self, id: TaskId) -> ApiResult<Vec<CompletionEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(&id)
            .copied()
            .unwrap_or(Duration::from_millis(5));
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing.contains(&id) {
            return Err(self.fail(id));
        }
        Ok(self.histories.get(&id).cloned().unwrap_or_default())
    }

    async fn completion_feed(&self) -> ApiResult<Vec<FeedEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.feed.clone())
    }
}

pub fn task(id: u64, title: &str) -> Task {
    Task::new(id, title, "2024-01-01T00:00:00Z")
}
