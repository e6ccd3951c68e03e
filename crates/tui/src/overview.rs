//! History overview across all tasks.
//!
//! One card per task, in task-list order. A task whose history failed to
//! load shows an error in its own card while the others render normally;
//! the combined error banner names every failed task.

use std::fmt;

use cadence_core::models::entry_count_label;
use cadence_core::{CardState, HistoryCard, HistoryOverview};
use chrono::{Local, TimeZone};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Entries shown per card
const ENTRIES_PER_CARD: usize = 5;

/// Render the overview tab.
pub fn render_overview_view(
    frame: &mut Frame,
    area: Rect,
    overview: &HistoryOverview,
    is_focused: bool,
    scroll_offset: usize,
) {
    let border_color = if is_focused {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(" Overview ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let lines = overview_lines(overview);
    let scroll = clamp_scroll(scroll_offset, lines.len());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn overview_lines(overview: &HistoryOverview) -> Vec<Line<'static>> {
    build_overview_lines(
        &overview.cards(),
        overview.error_message().as_deref(),
        overview.is_loading(),
        &Local,
    )
}

/// Number of lines the overview currently renders.
pub fn overview_line_count(overview: &HistoryOverview) -> usize {
    overview_lines(overview).len()
}

/// Keep the scroll offset on the content and within the widget's range.
pub fn clamp_scroll(offset: usize, line_count: usize) -> u16 {
    let offset = offset.min(line_count.saturating_sub(1));
    u16::try_from(offset).unwrap_or(u16::MAX)
}

/// Build the overview: optional error banner and loading line, then cards.
pub fn build_overview_lines<Tz>(
    cards: &[HistoryCard],
    error: Option<&str>,
    loading: bool,
    tz: &Tz,
) -> Vec<Line<'static>>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut lines = Vec::new();

    if let Some(message) = error {
        lines.push(Line::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(""));
    }
    if loading {
        lines.push(Line::styled(
            "Loading history...",
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(Line::from(""));
    }
    if cards.is_empty() && !loading {
        lines.push(Line::styled(
            "No tasks found",
            Style::default().fg(Color::DarkGray),
        ));
        return lines;
    }

    for card in cards {
        lines.extend(build_card_lines(card, loading, tz));
        lines.push(Line::from(""));
    }
    lines
}

fn build_card_lines<Tz>(card: &HistoryCard, loading: bool, tz: &Tz) -> Vec<Line<'static>>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let title = Span::styled(
        card.task.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    );

    match &card.state {
        CardState::Failed => vec![
            Line::from(title),
            Line::styled(
                "  Unable to load history",
                Style::default().fg(Color::Red),
            ),
        ],
        CardState::Entries(entries) if entries.is_empty() => {
            let note = if loading { "  ..." } else { "  No completions yet" };
            vec![
                Line::from(title),
                Line::styled(note, Style::default().fg(Color::DarkGray)),
            ]
        }
        CardState::Entries(entries) => {
            let mut lines = vec![Line::from(vec![
                title,
                Span::styled(
                    format!(" ({})", entry_count_label(entries.len())),
                    Style::default().fg(Color::DarkGray),
                ),
            ])];
            lines.extend(
                entries
                    .iter()
                    .take(ENTRIES_PER_CARD)
                    .map(|entry| Line::from(format!("  {}", entry.completed_at.format_in(tz, true)))),
            );
            if entries.len() > ENTRIES_PER_CARD {
                lines.push(Line::styled(
                    format!("  ... {} more", entries.len() - ENTRIES_PER_CARD),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines
        }
    }
}
