//! UI rendering for the TUI.
//!
//! Provides layout and widget rendering using ratatui.

use cadence_core::TaskApi;
use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::app::{ActiveTab, App};
use crate::calendar::render_calendar_view;
use crate::overview::render_overview_view;
use crate::task_list::render_task_list;

/// Tab titles for the right panel.
const TAB_TITLES: [&str; 2] = ["Calendar", "Overview"];

/// Legend text for keyboard shortcuts.
const LEGEND: &str = " [j/k] Navigate  [Enter] Calendar  [h/l] Month  [t] Today  [Esc] Close  [x] Done  [Tab] View  [r] Refresh  [q] Quit ";

/// Draw the entire UI.
pub fn draw<A: TaskApi + 'static>(frame: &mut Frame, app: &App<A>, today: NaiveDate) {
    let chunks = create_main_layout(frame.area());

    draw_task_panel(frame, chunks[0], app);
    draw_content_area(frame, chunks[1], app, today);
    draw_legend(frame, chunks[2], app.status());
}

/// Create the main three-part layout: task list, content area, legend.
fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content (list + content panels)
            Constraint::Length(1), // Legend bar
        ])
        .split(area)
        .iter()
        .flat_map(|&chunk| {
            if chunk.height > 1 {
                Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                    .split(chunk)
                    .to_vec()
            } else {
                vec![chunk]
            }
        })
        .collect()
}

fn draw_task_panel<A: TaskApi + 'static>(frame: &mut Frame, area: Rect, app: &App<A>) {
    render_task_list(
        frame,
        area,
        app.tasks(),
        app.selected_index(),
        app.focused_panel().is_navigation(),
    );
}

/// Draw the right content area with tabs and content.
fn draw_content_area<A: TaskApi + 'static>(
    frame: &mut Frame,
    area: Rect,
    app: &App<A>,
    today: NaiveDate,
) {
    let is_focused = app.focused_panel().is_content();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content area
        ])
        .split(area);

    draw_tabs(frame, chunks[0], app.active_tab(), is_focused);

    match app.active_tab() {
        ActiveTab::Calendar => render_calendar_view(
            frame,
            chunks[1],
            app.calendar(),
            app.cursor().current(),
            today,
            is_focused,
        ),
        ActiveTab::Overview => render_overview_view(
            frame,
            chunks[1],
            app.overview(),
            is_focused,
            app.overview_scroll(),
        ),
    }
}

/// Draw the tab bar.
fn draw_tabs(frame: &mut Frame, area: Rect, active: ActiveTab, is_focused: bool) {
    let titles: Vec<Line> = TAB_TITLES.iter().map(|t| Line::from(*t)).collect();

    let border_color = if is_focused {
        Color::Yellow
    } else {
        Color::Cyan
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .select(active.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Draw the legend bar, replaced by the status message when there is one.
fn draw_legend(frame: &mut Frame, area: Rect, status: Option<&str>) {
    let bar = match status {
        Some(message) => Paragraph::new(format!(" {} ", message))
            .style(Style::default().fg(Color::Black).bg(Color::Yellow)),
        None => Paragraph::new(LEGEND).style(Style::default().fg(Color::Black).bg(Color::Cyan)),
    };
    frame.render_widget(bar, area);
}
