//! Background loading for the TUI.
//!
//! Every fetch runs on its own tokio task and reports back over an
//! unbounded channel, so the event loop never blocks on the network.
//! Every load except a toggle carries the [`Ticket`] it was started with;
//! the app drops results whose ticket went stale in the meantime.

use std::sync::Arc;

use cadence_core::{
    ApiResult, HistoryAggregate, Task, TaskApi, TaskDetail, TaskId, Ticket, aggregate_histories,
};
use chrono::Local;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// A finished background load.
#[derive(Debug)]
pub enum LoadEvent {
    /// The task list.
    Tasks {
        ticket: Ticket,
        result: ApiResult<Vec<Task>>,
    },
    /// A single task with its history, for the calendar.
    Detail {
        ticket: Ticket,
        result: ApiResult<TaskDetail>,
    },
    /// Every task's history, for the overview.
    Overview {
        ticket: Ticket,
        aggregate: HistoryAggregate,
    },
    /// The server's answer to a completion toggle.
    Toggled(ApiResult<Task>),
}

/// Spawns fetches against a shared [`TaskApi`].
pub struct Loader<A> {
    api: Arc<A>,
    tx: UnboundedSender<LoadEvent>,
}

impl<A> Clone for Loader<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            tx: self.tx.clone(),
        }
    }
}

impl<A: TaskApi + 'static> Loader<A> {
    /// Create a loader and the receiving end of its event channel.
    pub fn new(api: A) -> (Self, UnboundedReceiver<LoadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                api: Arc::new(api),
                tx,
            },
            rx,
        )
    }

    /// Send an event; a closed channel means the app is gone, so the result
    /// is discarded.
    fn send(tx: &UnboundedSender<LoadEvent>, event: LoadEvent) {
        if tx.send(event).is_err() {
            debug!("load finished after the app shut down");
        }
    }

    /// Fetch the task list.
    pub fn load_tasks(&self, ticket: Ticket) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_tasks().await;
            Self::send(&tx, LoadEvent::Tasks { ticket, result });
        });
    }

    /// Fetch a task and its history for the calendar.
    pub fn load_detail(&self, ticket: Ticket, id: TaskId) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let now = Local::now();
            let result = TaskDetail::load(api.as_ref(), &id.to_string(), &now).await;
            Self::send(&tx, LoadEvent::Detail { ticket, result });
        });
    }

    /// Fetch every task's history for the overview.
    pub fn load_overview(&self, ticket: Ticket, tasks: Vec<Task>) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let aggregate = aggregate_histories(api.as_ref(), &tasks).await;
            Self::send(&tx, LoadEvent::Overview { ticket, aggregate });
        });
    }

    /// Ask the server to set today's completion for a task.
    pub fn toggle(&self, id: TaskId, completed: bool) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.set_completed(id, completed).await;
            Self::send(&tx, LoadEvent::Toggled(result));
        });
    }
}
