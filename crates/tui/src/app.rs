//! Main application state and event loop.

use std::io::{self, Stdout};
use std::time::Duration;

use cadence_core::{
    ApiError, Epoch, HistoryOverview, LoadState, MonthCursor, Task, TaskApi, TaskDetail, TaskId, TaskList,
};
use chrono::{Local, NaiveDate};
use crossterm::event::KeyEvent;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::data::{LoadEvent, Loader};
use crate::error::TuiResult;
use crate::event::{
    CalendarAction, is_down, is_enter, is_esc, is_left, is_quit, is_refresh, is_right, is_tab,
    is_toggle, is_up, poll_key,
};
use crate::overview::overview_line_count;
use crate::ui;

/// The active tab in the right panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Calendar,
    Overview,
}

impl ActiveTab {
    /// Cycle to the next tab.
    pub fn next(self) -> Self {
        match self {
            Self::Calendar => Self::Overview,
            Self::Overview => Self::Calendar,
        }
    }

    /// Get the index of the current tab.
    pub fn index(self) -> usize {
        match self {
            Self::Calendar => 0,
            Self::Overview => 1,
        }
    }
}

/// The currently focused panel (task list or content).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    /// The task list on the left.
    #[default]
    Navigation,
    /// The content panel on the right.
    Content,
}

impl FocusedPanel {
    /// Check if this is the navigation panel.
    pub fn is_navigation(self) -> bool {
        matches!(self, Self::Navigation)
    }

    /// Check if this is the content panel.
    pub fn is_content(self) -> bool {
        matches!(self, Self::Content)
    }
}

/// Main application state.
pub struct App<A> {
    /// Spawns fetches and owns the shared API handle.
    loader: Loader<A>,
    /// Finished loads waiting to be applied.
    events: UnboundedReceiver<LoadEvent>,
    /// Server copy of the task list.
    tasks: LoadState<TaskList>,
    /// Only the most recent task-list load may be applied.
    tasks_epoch: Epoch,
    /// Index of the currently selected task in the list.
    selected_index: usize,
    /// The active tab in the right panel.
    active_tab: ActiveTab,
    /// The currently focused panel.
    focused_panel: FocusedPanel,
    /// Whether the application is still running.
    running: bool,
    /// Month shown by the calendar.
    cursor: MonthCursor,
    /// Calendar contents; `None` while no calendar is open.
    calendar: Option<LoadState<TaskDetail>>,
    /// Stales calendar loads when the calendar closes or switches task.
    detail_epoch: Epoch,
    /// History overview for every task.
    overview: HistoryOverview,
    /// Scroll offset for the overview.
    overview_scroll: usize,
    /// Last transient message (toggle results, refresh failures).
    status: Option<String>,
}

impl<A: TaskApi + 'static> App<A> {
    /// Create the app and start loading the task list.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(api: A) -> Self {
        let (loader, events) = Loader::new(api);
        let tasks_epoch = Epoch::new();
        loader.load_tasks(tasks_epoch.begin());
        Self {
            loader,
            events,
            tasks: LoadState::Loading,
            tasks_epoch,
            selected_index: 0,
            active_tab: ActiveTab::default(),
            focused_panel: FocusedPanel::default(),
            running: true,
            cursor: MonthCursor::new(today()),
            calendar: None,
            detail_epoch: Epoch::new(),
            overview: HistoryOverview::new(Vec::new()),
            overview_scroll: 0,
            status: None,
        }
    }

    /// Get the task list state.
    pub fn tasks(&self) -> &LoadState<TaskList> {
        &self.tasks
    }

    /// Loaded tasks, empty while loading or after a failure.
    pub fn task_slice(&self) -> &[Task] {
        self.tasks.loaded().map(TaskList::tasks).unwrap_or_default()
    }

    /// Get the currently selected task index.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Get the currently selected task, if any.
    pub fn selected_task(&self) -> Option<&Task> {
        self.task_slice().get(self.selected_index)
    }

    /// Get the active tab.
    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    /// Get the currently focused panel.
    pub fn focused_panel(&self) -> FocusedPanel {
        self.focused_panel
    }

    /// Check if the application is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the calendar's month cursor.
    pub fn cursor(&self) -> &MonthCursor {
        &self.cursor
    }

    /// Get the calendar contents, `None` while closed.
    pub fn calendar(&self) -> Option<&LoadState<TaskDetail>> {
        self.calendar.as_ref()
    }

    /// Get the history overview.
    pub fn overview(&self) -> &HistoryOverview {
        &self.overview
    }

    /// Get the overview scroll offset.
    pub fn overview_scroll(&self) -> usize {
        self.overview_scroll
    }

    /// Get the last status message.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Request the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
        self.tasks_epoch.invalidate();
        self.detail_epoch.invalidate();
        self.overview.teardown();
    }

    /// Move selection down in the task list. Clamps to the last item.
    pub fn select_next(&mut self) {
        let max_items = self.task_slice().len();
        if max_items > 0 && self.selected_index < max_items - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up in the task list. Clamps to the first item.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Focus the navigation panel.
    pub fn focus_navigation(&mut self) {
        self.focused_panel = FocusedPanel::Navigation;
    }

    /// Focus the content panel.
    pub fn focus_content(&mut self) {
        self.focused_panel = FocusedPanel::Content;
    }

    /// Cycle to the next tab.
    ///
    /// Leaving the overview stales its pending load; entering it starts a
    /// fresh one.
    pub fn next_tab(&mut self) {
        if self.active_tab == ActiveTab::Overview {
            self.overview.teardown();
        }
        self.active_tab = self.active_tab.next();
        self.overview_scroll = 0;
        if self.active_tab == ActiveTab::Overview {
            self.refresh_overview();
        }
    }

    /// Open the calendar for the selected task.
    ///
    /// The month resets to the current one when the task differs from the
    /// one shown last.
    pub fn open_calendar(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id) else {
            return;
        };
        if self.cursor.follow_dataset(id, today()) {
            debug!(task_id = %id, "calendar switched task");
        }
        self.active_tab = ActiveTab::Calendar;
        self.focus_content();
        self.load_calendar(id);
    }

    /// Close the calendar and return to the task list.
    pub fn close_calendar(&mut self) {
        self.detail_epoch.invalidate();
        self.calendar = None;
        self.focus_navigation();
    }

    /// Apply a calendar key.
    pub fn handle_calendar_action(&mut self, action: CalendarAction) {
        match action {
            CalendarAction::PreviousMonth => self.cursor.previous_month(),
            CalendarAction::NextMonth => self.cursor.next_month(),
            CalendarAction::Today => self.cursor.today(today()),
            CalendarAction::Close => self.close_calendar(),
        }
    }

    /// Reload the task list; dependent views follow once it arrives.
    pub fn refresh(&mut self) {
        self.status = None;
        self.loader.load_tasks(self.tasks_epoch.begin());
    }

    /// Flip today's completion for the selected task.
    pub fn toggle_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.loader.toggle(task.id, !task.completed_today);
        }
    }

    fn load_calendar(&mut self, id: TaskId) {
        let ticket = self.detail_epoch.begin();
        self.calendar = Some(LoadState::Loading);
        self.loader.load_detail(ticket, id);
    }

    fn refresh_overview(&mut self) {
        if let Some((ticket, tasks)) = self.overview.begin_refresh() {
            self.loader.load_overview(ticket, tasks);
        }
    }

    /// Called whenever the task list changed on the server side.
    fn tasks_changed(&mut self) {
        let tasks = self.task_slice().to_vec();
        if !tasks.is_empty() && self.selected_index >= tasks.len() {
            self.selected_index = tasks.len() - 1;
        }

        // Reload the open calendar, or close it if its task is gone
        if self.calendar.is_some()
            && let Some(&id) = self.cursor.dataset()
        {
            if tasks.iter().any(|task| task.id == id) {
                self.load_calendar(id);
            } else {
                self.close_calendar();
            }
        }

        self.overview.set_tasks(tasks);
        if self.active_tab == ActiveTab::Overview {
            self.refresh_overview();
        }
    }

    /// Apply a finished load.
    pub fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Tasks { ticket, .. } if !self.tasks_epoch.is_current(&ticket) => {
                debug!(generation = ticket.generation(), "discarding stale task list");
            }
            LoadEvent::Tasks {
                result: Ok(tasks), ..
            } => {
                info!(count = tasks.len(), "task list loaded");
                self.tasks = LoadState::Loaded(TaskList::new(tasks));
                self.tasks_changed();
            }
            LoadEvent::Tasks { result: Err(err), .. } => {
                warn!(error = %err.full_message(), "failed to load tasks");
                if self.tasks.loaded().is_some() {
                    self.status = Some(status_message(&err));
                } else {
                    self.tasks = LoadState::Failed(err.to_string());
                }
            }
            LoadEvent::Detail { ticket, result } => {
                if !self.detail_epoch.is_current(&ticket) {
                    debug!(generation = ticket.generation(), "discarding stale calendar load");
                    return;
                }
                if let Err(err) = &result {
                    warn!(error = %err.full_message(), "failed to load task detail");
                }
                self.calendar = Some(LoadState::from_result(result));
            }
            LoadEvent::Overview { ticket, aggregate } => {
                self.overview.apply(&ticket, aggregate);
            }
            LoadEvent::Toggled(Ok(task)) => {
                self.status = Some(if task.completed_today {
                    format!("Completed: {}", task.title)
                } else {
                    format!("Cleared today's completion: {}", task.title)
                });
                if let LoadState::Loaded(list) = &mut self.tasks
                    && list.replace(task)
                {
                    self.tasks_changed();
                }
            }
            LoadEvent::Toggled(Err(err)) => {
                warn!(error = %err.full_message(), "failed to update completion");
                self.status = Some(status_message(&err));
            }
        }
    }

    /// Apply every load that has finished so far.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }
    }

    /// Wait for the next finished load and apply it.
    ///
    /// Returns `false` if no more loads can arrive.
    pub async fn wait_for_load(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Run the main application loop.
    ///
    /// This initializes the terminal, runs the event loop, and ensures
    /// the terminal is restored on exit (even on panic).
    pub async fn run(&mut self) -> TuiResult<()> {
        let mut terminal = init_terminal()?;

        // Use scopeguard to ensure terminal cleanup on panic
        let _guard = scopeguard::guard((), |()| {
            let _ = restore_terminal();
        });

        let result = self.event_loop(&mut terminal).await;

        drop(_guard);

        result
    }

    /// The main event loop.
    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> TuiResult<()> {
        while self.running {
            self.process_events();

            let today = today();
            terminal.draw(|frame| ui::draw(frame, self, today))?;

            if let Some(key) = poll_key(Duration::from_millis(100))? {
                self.handle_key(&key);
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Handle a keyboard event.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        // Global keys work regardless of focus
        if is_quit(key) {
            self.quit();
            return;
        }
        if is_tab(key) {
            self.next_tab();
            return;
        }
        if is_refresh(key) {
            self.refresh();
            return;
        }

        match self.focused_panel {
            FocusedPanel::Navigation => {
                if is_down(key) {
                    self.select_next();
                } else if is_up(key) {
                    self.select_previous();
                } else if is_enter(key) {
                    self.open_calendar();
                } else if is_toggle(key) {
                    self.toggle_selected();
                } else if is_right(key) {
                    self.focus_content();
                }
            }
            FocusedPanel::Content => match self.active_tab {
                ActiveTab::Calendar if self.calendar.is_some() => {
                    if let Some(action) = CalendarAction::from_key(key) {
                        self.handle_calendar_action(action);
                    }
                }
                ActiveTab::Calendar => {
                    if is_left(key) || is_esc(key) {
                        self.focus_navigation();
                    }
                }
                ActiveTab::Overview => {
                    if is_left(key) || is_esc(key) {
                        self.focus_navigation();
                    } else if is_down(key) {
                        let last = overview_line_count(&self.overview).saturating_sub(1);
                        self.overview_scroll = (self.overview_scroll + 1).min(last);
                    } else if is_up(key) {
                        self.overview_scroll = self.overview_scroll.saturating_sub(1);
                    }
                }
            },
        }
    }
}

/// Status-line text for a failed request.
///
/// Failures on the server side get a retry hint; local ones (bad input)
/// would fail the same way again.
pub fn status_message(err: &ApiError) -> String {
    if err.is_transport() {
        format!("{} (press r to retry)", err)
    } else {
        err.to_string()
    }
}

/// The local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> TuiResult<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
