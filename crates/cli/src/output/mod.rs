//! Output formatting module for Cadence
//!
//! Plain-text renderings of tasks, month grids, statistics, history cards
//! and the completion feed.

use std::fmt;

use cadence_core::grid::WEEKDAY_LABELS;
use cadence_core::models::entry_count_label;
use cadence_core::{
    CardState, CompletionStats, FeedEntry, HistoryCard, MonthGrid, MonthGridCell, Task,
    TaskDetail,
};
use chrono::TimeZone;

/// Maximum width for the title column before truncation
const MAX_TITLE_WIDTH: usize = 40;

/// Width of one calendar cell, including its completion marker
const CELL_WIDTH: usize = 5;

/// Shown in the feed when an entry carries no task title
const UNKNOWN_TASK: &str = "(unknown task)";

/// Truncate a string to `max_width` characters, adding ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{}...", head)
    }
}

/// Format tasks into an aligned table string.
///
/// ```text
/// ID  Type    Today  Title
/// --  ------  -----  ----------
/// 1   daily   [x]    Run
/// ```
pub fn format_task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let headers = ["ID", "Type", "Today", "Title"];

    let id_width = tasks
        .iter()
        .map(|t| t.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max(headers[0].len());
    let type_width = tasks
        .iter()
        .map(|t| t.task_type.as_str().len())
        .max()
        .unwrap_or(0)
        .max(headers[1].len());
    let today_width = headers[2].len();
    let title_width = tasks
        .iter()
        .map(|t| t.title.chars().count().min(MAX_TITLE_WIDTH))
        .max()
        .unwrap_or(0)
        .max(headers[3].len());

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_w$}  {:<type_w$}  {:<today_w$}  {}\n",
        headers[0],
        headers[1],
        headers[2],
        headers[3],
        id_w = id_width,
        type_w = type_width,
        today_w = today_width,
    ));
    output.push_str(&format!(
        "{:->id_w$}  {:->type_w$}  {:->today_w$}  {:->title_w$}\n",
        "",
        "",
        "",
        "",
        id_w = id_width,
        type_w = type_width,
        today_w = today_width,
        title_w = title_width,
    ));

    for task in tasks {
        output.push_str(&format!(
            "{:<id_w$}  {:<type_w$}  {:<today_w$}  {}\n",
            task.id.to_string(),
            task.task_type.as_str(),
            completion_marker(task.completed_today),
            truncate(&task.title, MAX_TITLE_WIDTH),
            id_w = id_width,
            type_w = type_width,
            today_w = today_width,
        ));
    }

    output.pop();
    output
}

fn completion_marker(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// Render one calendar cell: `[n]` marks today, a trailing `*` a completion.
fn format_cell(cell: &MonthGridCell) -> String {
    match cell {
        MonthGridCell::Padding => " ".repeat(CELL_WIDTH),
        MonthGridCell::Day {
            day,
            completed,
            today,
        } => {
            let number = if *today {
                format!("[{}]", day)
            } else {
                day.to_string()
            };
            let marker = if *completed { '*' } else { ' ' };
            format!("{:>4}{}", number, marker)
        }
    }
}

/// Format a month grid as a Sunday-first calendar with its summary.
///
/// ```text
/// February 2024
///   Sun  Mon  Tue  Wed  Thu  Fri  Sat
///                          1    2*   3
/// ...
/// 2 of 29 days completed (7%)
/// ```
pub fn format_month_grid(grid: &MonthGrid) -> String {
    let mut lines = vec![grid.month.label()];

    let header: String = WEEKDAY_LABELS
        .iter()
        .map(|label| format!("{:>4} ", label))
        .collect();
    lines.push(header.trim_end().to_string());

    for week in grid.weeks() {
        let row: String = week.iter().map(format_cell).collect();
        lines.push(row.trim_end().to_string());
    }

    lines.push(String::new());
    lines.push(format!(
        "{} ({}%)",
        grid.summary(),
        grid.completion_percent
    ));
    lines.push("* completed   [n] today".to_string());
    lines.join("\n")
}

/// Lifetime and monthly completion rates.
pub fn format_stats(stats: &CompletionStats) -> String {
    format!(
        "Lifetime:   {}%\nThis month: {}%",
        stats.lifetime_rounded(),
        stats.monthly_rounded()
    )
}

/// Full task view: fields, statistics and up to `limit` recent completions.
pub fn format_task_detail<Tz>(detail: &TaskDetail, tz: &Tz, limit: usize) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let task = &detail.task;
    let mut lines = vec![
        format!("{} (#{})", task.title, task.id),
        format!("Type:      {}", task.task_type),
        format!("Created:   {}", task.created_at.format_in(tz, false)),
        format!(
            "Today:     {}",
            if task.completed_today { "done" } else { "pending" }
        ),
    ];
    if !task.description.trim().is_empty() {
        lines.push(String::new());
        lines.push(task.description.trim().to_string());
    }

    lines.push(String::new());
    lines.push(format_stats(&detail.stats));

    lines.push(String::new());
    lines.push(format!("History ({})", entry_count_label(detail.history.len())));
    if detail.history.is_empty() {
        lines.push("  No completions yet.".to_string());
    }
    for entry in detail.history.iter().take(limit) {
        lines.push(format!("  {}", entry.completed_at.format_in(tz, true)));
    }
    if detail.history.len() > limit {
        lines.push(format!("  ... {} more", detail.history.len() - limit));
    }
    lines.join("\n")
}

/// Format one overview card with at most `limit` entries.
pub fn format_history_card<Tz>(card: &HistoryCard, tz: &Tz, limit: usize) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match &card.state {
        CardState::Failed => format!("{}\n  Unable to load history", card.task.title),
        CardState::Entries(entries) => {
            let mut lines = vec![format!(
                "{} ({})",
                card.task.title,
                entry_count_label(entries.len())
            )];
            if entries.is_empty() {
                lines.push("  No completions yet.".to_string());
            }
            for entry in entries.iter().take(limit) {
                lines.push(format!("  {}", entry.completed_at.format_in(tz, true)));
            }
            if entries.len() > limit {
                lines.push(format!("  ... {} more", entries.len() - limit));
            }
            lines.join("\n")
        }
    }
}

/// Format the whole overview, prefixed by the combined error if any task failed.
pub fn format_overview<Tz>(
    cards: &[HistoryCard],
    error: Option<&str>,
    tz: &Tz,
    limit: usize,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if cards.is_empty() {
        return "No tasks found.".to_string();
    }

    let mut blocks = Vec::with_capacity(cards.len() + 1);
    if let Some(message) = error {
        blocks.push(format!("warning: {}", message));
    }
    blocks.extend(cards.iter().map(|card| format_history_card(card, tz, limit)));
    blocks.join("\n\n")
}

/// Format the global completion feed, one line per entry.
pub fn format_feed<Tz>(entries: &[FeedEntry], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if entries.is_empty() {
        return "No completions recorded.".to_string();
    }

    let stamps: Vec<String> = entries
        .iter()
        .map(|entry| entry.completed_at.format_in(tz, true))
        .collect();
    let width = stamps.iter().map(|s| s.chars().count()).max().unwrap_or(0);

    entries
        .iter()
        .zip(stamps)
        .map(|(entry, stamp)| {
            let title = if entry.task_title.trim().is_empty() {
                UNKNOWN_TASK
            } else {
                entry.task_title.as_str()
            };
            format!("{:<width$}  {}", stamp, title, width = width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
