//! TUI module for Cadence
//!
//! Provides a terminal user interface for browsing recurring tasks, their
//! monthly completion calendars and the history overview, using ratatui
//! and crossterm.

pub mod app;
pub mod calendar;
pub mod data;
pub mod error;
pub mod event;
pub mod overview;
pub mod task_list;
pub mod ui;

pub use app::{ActiveTab, App, FocusedPanel};
pub use data::{LoadEvent, Loader};
pub use error::{TuiError, TuiResult};
