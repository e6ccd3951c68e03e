//! Event handling for the TUI.
//!
//! Provides keyboard event polling and key classification.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::TuiResult;

/// Poll for keyboard events with a timeout.
///
/// Returns `Some(KeyEvent)` if a key was pressed within the timeout,
/// or `None` if no key was pressed. Key releases are ignored.
pub fn poll_key(timeout: Duration) -> TuiResult<Option<KeyEvent>> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind != KeyEventKind::Release
    {
        return Ok(Some(key));
    }
    Ok(None)
}

/// Check if the key event is a plain character press.
fn is_plain_char(key: &KeyEvent, c: char) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char(pressed),
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            ..
        } if *pressed == c
    )
}

/// Check if the key event represents a quit command.
///
/// Returns `true` for 'q' key or Ctrl+C.
pub fn is_quit(key: &KeyEvent) -> bool {
    is_plain_char(key, 'q')
        || matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        )
}

/// Check if the key event is the Tab key.
pub fn is_tab(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Tab,
            ..
        }
    )
}

/// Check if the key event is the down navigation key (j or Down arrow).
pub fn is_down(key: &KeyEvent) -> bool {
    is_plain_char(key, 'j') || key.code == KeyCode::Down
}

/// Check if the key event is the up navigation key (k or Up arrow).
pub fn is_up(key: &KeyEvent) -> bool {
    is_plain_char(key, 'k') || key.code == KeyCode::Up
}

/// Check if the key event is the Enter key.
pub fn is_enter(key: &KeyEvent) -> bool {
    key.code == KeyCode::Enter
}

/// Check if the key event is the Escape key.
pub fn is_esc(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
}

/// Check if the key event moves left (h or Left arrow).
pub fn is_left(key: &KeyEvent) -> bool {
    is_plain_char(key, 'h') || key.code == KeyCode::Left
}

/// Check if the key event moves right (l or Right arrow).
pub fn is_right(key: &KeyEvent) -> bool {
    is_plain_char(key, 'l') || key.code == KeyCode::Right
}

/// Check if the key event asks for a refresh ('r').
pub fn is_refresh(key: &KeyEvent) -> bool {
    is_plain_char(key, 'r')
}

/// Check if the key event toggles today's completion (space or 'x').
pub fn is_toggle(key: &KeyEvent) -> bool {
    is_plain_char(key, ' ') || is_plain_char(key, 'x')
}

/// Keys understood by an open calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarAction {
    PreviousMonth,
    NextMonth,
    Today,
    Close,
}

impl CalendarAction {
    /// Classify a key press for the calendar.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if is_left(key) {
            Some(Self::PreviousMonth)
        } else if is_right(key) {
            Some(Self::NextMonth)
        } else if is_plain_char(key, 't') {
            Some(Self::Today)
        } else if is_esc(key) {
            Some(Self::Close)
        } else {
            None
        }
    }
}
