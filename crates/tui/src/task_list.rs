//! Task list panel.

use cadence_core::{LoadState, Task, TaskList};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the left-hand task list.
pub fn render_task_list(
    frame: &mut Frame,
    area: Rect,
    tasks: &LoadState<TaskList>,
    selected_index: usize,
    is_focused: bool,
) {
    let border_color = if is_focused {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(" Tasks ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let paragraph = match tasks {
        LoadState::Loading => Paragraph::new("Loading tasks...")
            .style(Style::default().fg(Color::DarkGray)),
        LoadState::Failed(message) => {
            Paragraph::new(format!("Error: {}", message)).style(Style::default().fg(Color::Red))
        }
        LoadState::Loaded(list) if list.is_empty() => {
            Paragraph::new("No tasks found").style(Style::default().fg(Color::DarkGray))
        }
        LoadState::Loaded(list) => Paragraph::new(build_task_lines(list.tasks(), selected_index)),
    };

    frame.render_widget(paragraph.block(block), area);
}

/// One line per task: completion box, title and recurrence type.
pub fn build_task_lines(tasks: &[Task], selected_index: usize) -> Vec<Line<'static>> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| render_task_line(task, i == selected_index))
        .collect()
}

fn render_task_line(task: &Task, is_selected: bool) -> Line<'static> {
    let marker = if task.completed_today { "[x]" } else { "[ ]" };
    let style = if is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if task.completed_today {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(format!("{} {}", marker, task.title), style),
        Span::styled(
            format!(" ({})", task.task_type),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}
