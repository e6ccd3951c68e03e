//! Calendar view for a single task.
//!
//! Shows one month as a Sunday-first grid with completed days and today
//! highlighted, followed by the month summary and the task's statistics.

use cadence_core::grid::WEEKDAY_LABELS;
use cadence_core::{LoadState, MonthGrid, MonthGridCell, TaskDetail, YearMonth};
use chrono::{Local, NaiveDate};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the calendar tab.
pub fn render_calendar_view(
    frame: &mut Frame,
    area: Rect,
    calendar: Option<&LoadState<TaskDetail>>,
    month: YearMonth,
    today: NaiveDate,
    is_focused: bool,
) {
    let border_color = if is_focused {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(" Calendar ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let lines = match calendar {
        None => vec![Line::styled(
            "Select a task and press Enter to open its calendar",
            Style::default().fg(Color::DarkGray),
        )],
        Some(LoadState::Loading) => vec![Line::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )],
        Some(LoadState::Failed(message)) => vec![Line::styled(
            format!("Error: {}", message),
            Style::default().fg(Color::Red),
        )],
        Some(LoadState::Loaded(detail)) => {
            let grid = detail.grid(month, &Local, today);
            build_calendar_lines(detail, &grid)
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Build all the lines for a loaded calendar.
pub fn build_calendar_lines(detail: &TaskDetail, grid: &MonthGrid) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(
            detail.task.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled(
            format!("<  {}  >", grid.month.label()),
            Style::default().fg(Color::Cyan),
        ),
        Line::from(""),
        weekday_header(),
    ];

    lines.extend(grid.weeks().iter().map(|week| week_line(week)));

    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{} ({}%)",
        grid.summary(),
        grid.completion_percent
    )));
    lines.push(Line::from(format!(
        "Lifetime: {}%   This month: {}%",
        detail.stats.lifetime_rounded(),
        detail.stats.monthly_rounded()
    )));
    lines
}

fn weekday_header() -> Line<'static> {
    let spans: Vec<Span> = WEEKDAY_LABELS
        .iter()
        .map(|label| {
            Span::styled(
                format!("{:>4} ", label),
                Style::default().fg(Color::DarkGray),
            )
        })
        .collect();
    Line::from(spans)
}

fn week_line(week: &[MonthGridCell]) -> Line<'static> {
    Line::from(week.iter().flat_map(cell_spans).collect::<Vec<_>>())
}

/// A day number followed by an unstyled gap, so highlights stay separate.
fn cell_spans(cell: &MonthGridCell) -> [Span<'static>; 2] {
    match cell {
        MonthGridCell::Padding => [Span::raw("    "), Span::raw(" ")],
        MonthGridCell::Day {
            day,
            completed,
            today,
        } => {
            let mut style = Style::default();
            if *completed {
                style = style.fg(Color::Black).bg(Color::Green);
            }
            if *today {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            [Span::styled(format!("{:>4}", day), style), Span::raw(" ")]
        }
    }
}
