//! Core library for Cadence
//!
//! Provides the Task API client and models, plus the completion-tracking
//! view model shared by the CLI and TUI: day keys, month grids, calendar
//! navigation, multi-task history aggregation and completion statistics.

pub mod client;
pub mod config;
pub mod daykey;
pub mod epoch;
pub mod error;
pub mod grid;
pub mod history;
pub mod models;
pub mod navigation;
pub mod stats;
pub mod view;

pub use client::{HttpTaskApi, TaskApi};
pub use config::Config;
pub use daykey::{DayKey, day_keys, to_day_key};
pub use epoch::{Epoch, Ticket};
pub use error::{ApiError, ApiResult};
pub use grid::{MonthGrid, MonthGridCell, YearMonth, build_month_grid, percent_rounded};
pub use history::{
    CardState, FailedTask, HistoryAggregate, HistoryByTask, HistoryCard, HistoryOverview,
    aggregate_histories,
};
pub use models::{
    CompletionEntry, FeedEntry, NewTask, Task, TaskId, TaskType, Timestamp, UNKNOWN_DATE,
};
pub use navigation::MonthCursor;
pub use stats::{CompletionStats, compute_stats};
pub use view::{LoadState, TaskDetail, TaskList, load_feed};
