//! Multi-task completion history.
//!
//! [`aggregate_histories`] fans out one history request per task, waits for
//! every one of them to settle, and folds the outcomes into a single
//! [`HistoryAggregate`]. A failing task never hides its siblings' data.
//!
//! [`HistoryOverview`] is the view state built on top of it: it owns the
//! task list, replaces results wholesale on refresh, and uses an [`Epoch`]
//! so results from superseded loads are dropped.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::client::TaskApi;
use crate::epoch::{Epoch, Ticket};
use crate::models::{CompletionEntry, Task, TaskId, sort_newest_first};

/// Successful history fetches keyed by task.
pub type HistoryByTask = HashMap<TaskId, Vec<CompletionEntry>>;

/// A task whose history could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTask {
    pub id: TaskId,
    pub title: String,
}

/// Combined outcome of one aggregation round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryAggregate {
    /// Entries for every task whose fetch succeeded (possibly empty).
    pub by_task: HistoryByTask,
    /// Tasks whose fetch failed, in request order.
    pub failed: Vec<FailedTask>,
}

/// What a single task's card should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardState {
    /// Entries sorted newest first.
    Entries(Vec<CompletionEntry>),
    /// The fetch for this task failed.
    Failed,
}

/// One card of the overview, in task order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryCard {
    pub task: Task,
    pub state: CardState,
}

impl HistoryAggregate {
    /// Titles of failed tasks, in request order.
    pub fn failed_task_titles(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.title.clone()).collect()
    }

    /// A single message naming every failed task, if any failed.
    pub fn error_message(&self) -> Option<String> {
        if self.failed.is_empty() {
            return None;
        }
        Some(format!(
            "Unable to load history for: {}",
            self.failed_task_titles().join(", ")
        ))
    }

    /// Whether `id` was requested and failed.
    pub fn is_failed(&self, id: TaskId) -> bool {
        self.failed.iter().any(|f| f.id == id)
    }

    /// Card contents for `task`.
    ///
    /// A task that was never requested shows no entries.
    pub fn card(&self, task: &Task) -> HistoryCard {
        let state = if self.is_failed(task.id) {
            CardState::Failed
        } else {
            let mut entries = self.by_task.get(&task.id).cloned().unwrap_or_default();
            sort_newest_first(&mut entries);
            CardState::Entries(entries)
        };
        HistoryCard {
            task: task.clone(),
            state,
        }
    }
}

/// Fetch every task's history concurrently and fold the outcomes.
///
/// All requests run to completion before the result is built; failures
/// are recorded per task. An empty task list returns immediately without
/// touching the API.
pub async fn aggregate_histories<A: TaskApi>(api: &A, tasks: &[Task]) -> HistoryAggregate {
    if tasks.is_empty() {
        return HistoryAggregate::default();
    }

    debug!(count = tasks.len(), "fetching task histories");
    let results = join_all(tasks.iter().map(|task| api.task_history(task.id))).await;

    let mut aggregate = HistoryAggregate::default();
    for (task, result) in tasks.iter().zip(results) {
        match result {
            Ok(entries) => {
                aggregate.by_task.insert(task.id, entries);
            }
            Err(err) => {
                warn!(
                    task_id = %task.id,
                    title = %task.title,
                    error = %err.full_message(),
                    "failed to load task history"
                );
                aggregate.failed.push(FailedTask {
                    id: task.id,
                    title: task.title.clone(),
                });
            }
        }
    }
    aggregate
}

/// View state for the history overview.
#[derive(Debug)]
pub struct HistoryOverview {
    tasks: Vec<Task>,
    aggregate: HistoryAggregate,
    loading: bool,
    epoch: Epoch,
}

impl HistoryOverview {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            aggregate: HistoryAggregate::default(),
            loading: false,
            epoch: Epoch::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn aggregate(&self) -> &HistoryAggregate {
        &self.aggregate
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Combined error for partially failed loads.
    pub fn error_message(&self) -> Option<String> {
        self.aggregate.error_message()
    }

    /// Replace the task list. A different list drops current results and
    /// stales any load in flight.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        if tasks == self.tasks {
            return;
        }
        self.epoch.invalidate();
        self.tasks = tasks;
        self.aggregate = HistoryAggregate::default();
        self.loading = false;
    }

    /// Start a load for the current task list.
    ///
    /// Returns the ticket and a snapshot of the tasks to fetch, or `None`
    /// when there is nothing to fetch (the state is reset to empty).
    pub fn begin_refresh(&mut self) -> Option<(Ticket, Vec<Task>)> {
        if self.tasks.is_empty() {
            self.epoch.invalidate();
            self.aggregate = HistoryAggregate::default();
            self.loading = false;
            return None;
        }
        self.loading = true;
        Some((self.epoch.begin(), self.tasks.clone()))
    }

    /// Apply a finished load if its ticket is still current.
    ///
    /// Returns `false` when the result was discarded as stale.
    pub fn apply(&mut self, ticket: &Ticket, aggregate: HistoryAggregate) -> bool {
        if !self.epoch.is_current(ticket) {
            debug!(generation = ticket.generation(), "discarding stale history result");
            return false;
        }
        info!(
            loaded = aggregate.by_task.len(),
            failed = aggregate.failed.len(),
            "history overview refreshed"
        );
        self.aggregate = aggregate;
        self.loading = false;
        true
    }

    /// Fetch and apply in one step.
    pub async fn refresh<A: TaskApi>(&mut self, api: &A) -> bool {
        let Some((ticket, tasks)) = self.begin_refresh() else {
            return true;
        };
        let aggregate = aggregate_histories(api, &tasks).await;
        self.apply(&ticket, aggregate)
    }

    /// Stale every outstanding load; the view is going away.
    pub fn teardown(&mut self) {
        self.epoch.invalidate();
        self.loading = false;
    }

    /// Cards for every task, in task order.
    pub fn cards(&self) -> Vec<HistoryCard> {
        self.tasks.iter().map(|task| self.aggregate.card(task)).collect()
    }
}

impl Drop for HistoryOverview {
    fn drop(&mut self) {
        self.epoch.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, title: &str) -> Task {
        Task::new(id, title, "2024-01-01T00:00:00Z")
    }

    #[test]
    fn test_error_message_names_all_failed_tasks() {
        let aggregate = HistoryAggregate {
            by_task: HashMap::new(),
            failed: vec![
                FailedTask {
                    id: TaskId::new(1),
                    title: "Run".to_string(),
                },
                FailedTask {
                    id: TaskId::new(2),
                    title: "Read".to_string(),
                },
            ],
        };
        assert_eq!(
            aggregate.error_message().unwrap(),
            "Unable to load history for: Run, Read"
        );
        assert_eq!(aggregate.failed_task_titles(), vec!["Run", "Read"]);
    }

    #[test]
    fn test_no_error_message_without_failures() {
        assert!(HistoryAggregate::default().error_message().is_none());
    }

    #[test]
    fn test_card_sorts_entries_newest_first() {
        let mut by_task = HashMap::new();
        by_task.insert(
            TaskId::new(1),
            vec![
                CompletionEntry::new(10, "2024-01-01T10:00:00Z"),
                CompletionEntry::new(11, "2024-01-05T10:00:00Z"),
            ],
        );
        let aggregate = HistoryAggregate {
            by_task,
            failed: Vec::new(),
        };
        let card = aggregate.card(&task(1, "Run"));
        match card.state {
            CardState::Entries(entries) => {
                assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![11, 10]);
            }
            CardState::Failed => panic!("expected entries"),
        }
    }

    #[test]
    fn test_card_for_failed_and_unrequested_tasks() {
        let aggregate = HistoryAggregate {
            by_task: HashMap::new(),
            failed: vec![FailedTask {
                id: TaskId::new(2),
                title: "Read".to_string(),
            }],
        };
        assert_eq!(aggregate.card(&task(2, "Read")).state, CardState::Failed);
        assert_eq!(
            aggregate.card(&task(3, "Other")).state,
            CardState::Entries(Vec::new())
        );
    }

    #[test]
    fn test_begin_refresh_with_no_tasks_resets_without_ticket() {
        let mut overview = HistoryOverview::new(Vec::new());
        assert!(overview.begin_refresh().is_none());
        assert!(!overview.is_loading());
        assert!(overview.cards().is_empty());
    }

    #[test]
    fn test_set_tasks_stales_in_flight_load() {
        let mut overview = HistoryOverview::new(vec![task(1, "Run")]);
        let (ticket, _) = overview.begin_refresh().unwrap();
        assert!(overview.is_loading());

        overview.set_tasks(vec![task(2, "Read")]);
        assert!(!overview.apply(&ticket, HistoryAggregate::default()));
        assert!(!overview.is_loading());
    }

    #[test]
    fn test_set_tasks_with_same_list_keeps_load() {
        let mut overview = HistoryOverview::new(vec![task(1, "Run")]);
        let (ticket, _) = overview.begin_refresh().unwrap();
        overview.set_tasks(vec![task(1, "Run")]);
        assert!(overview.apply(&ticket, HistoryAggregate::default()));
    }

    #[test]
    fn test_late_result_from_older_refresh_is_discarded() {
        let mut overview = HistoryOverview::new(vec![task(1, "Run")]);
        let (old, _) = overview.begin_refresh().unwrap();
        let (new, _) = overview.begin_refresh().unwrap();

        let mut fresh = HistoryAggregate::default();
        fresh
            .by_task
            .insert(TaskId::new(1), vec![CompletionEntry::new(2, "2024-02-02T00:00:00Z")]);
        assert!(overview.apply(&new, fresh.clone()));

        let mut stale = HistoryAggregate::default();
        stale
            .by_task
            .insert(TaskId::new(1), vec![CompletionEntry::new(1, "2024-01-01T00:00:00Z")]);
        assert!(!overview.apply(&old, stale));
        assert_eq!(overview.aggregate(), &fresh);
    }

    #[test]
    fn test_teardown_discards_pending_result() {
        let mut overview = HistoryOverview::new(vec![task(1, "Run")]);
        let (ticket, _) = overview.begin_refresh().unwrap();
        overview.teardown();
        assert!(!overview.apply(&ticket, HistoryAggregate::default()));
    }
}
