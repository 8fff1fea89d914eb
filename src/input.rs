//! Terminal input → game commands.
//!
//! One-shot actions (quit, confirm, fire, pointer taps) come back as a
//! `Command` from `handle`.  Movement keys are instead tracked as "held" so
//! several can act in the same frame.

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms at
/// 60 FPS) is always refreshed before expiry.
pub const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Enter: start from the title screen or restart after game over.
    Confirm,
    Fire,
    /// Pointer pressed at a terminal cell.
    Tap { column: u16, row: u16 },
    /// Pointer moved (or dragged) to a terminal cell.
    Drag { column: u16, row: u16 },
    /// Terminal resized to `columns` x `rows`.
    Resize { columns: u16, rows: u16 },
}

/// Held-key bookkeeping across frames.
#[derive(Debug, Default)]
pub struct InputState {
    /// Maps each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

fn is_movement(code: &KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Left
            | KeyCode::Right
            | KeyCode::Char('a')
            | KeyCode::Char('A')
            | KeyCode::Char('d')
            | KeyCode::Char('D')
    )
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once at the top of every frame, before draining events.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn handle(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => handle_mouse(mouse),
            Event::Resize(columns, rows) => Some(Command::Resize {
                columns: *columns,
                rows: *rows,
            }),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Command> {
        let KeyEvent {
            code,
            kind,
            modifiers,
            ..
        } = key;
        match kind {
            KeyEventKind::Press => {
                if is_movement(code) {
                    self.key_frame.insert(*code, self.frame);
                    return None;
                }
                match code {
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Command::Quit)
                    }
                    KeyCode::Enter => Some(Command::Confirm),
                    KeyCode::Char(' ') => Some(Command::Fire),
                    _ => None,
                }
            }
            // Repeat refreshes a held key but never re-fires.
            KeyEventKind::Repeat => {
                if is_movement(code) {
                    self.key_frame.insert(*code, self.frame);
                }
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(code);
                None
            }
        }
    }

    fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn left_held(&self) -> bool {
        self.is_held(&KeyCode::Left)
            || self.is_held(&KeyCode::Char('a'))
            || self.is_held(&KeyCode::Char('A'))
    }

    pub fn right_held(&self) -> bool {
        self.is_held(&KeyCode::Right)
            || self.is_held(&KeyCode::Char('d'))
            || self.is_held(&KeyCode::Char('D'))
    }
}

fn handle_mouse(mouse: &MouseEvent) -> Option<Command> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Command::Tap { column, row }),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            Some(Command::Drag { column, row })
        }
        _ => None,
    }
}
