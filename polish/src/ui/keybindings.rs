//! Keybinding dispatcher for polish.
//!
//! Translates crossterm key and mouse events into `AppState` mutations and
//! returns a `KeyAction` for the work the event loop owns (database writes,
//! quitting). Dispatch branches first on `state.mode`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use polish_core::PolishResult;
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// What the event loop must do after a key has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// Write the draft to the database.
    Save,
    /// A review was closed; record it in the polish history.
    RecordReview(PolishResult),
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    if let Some(action) = handle_review_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char('H') => {
            state.focus = state.focus.prev();
            KeyAction::Continue
        }
        KeyCode::Char('L') => {
            state.focus = state.focus.next();
            KeyAction::Continue
        }
        KeyCode::Enter if state.focus == PanelFocus::Fields => {
            state.focus = PanelFocus::Editor;
            KeyAction::Continue
        }

        KeyCode::Char('<') => { state.shrink_editor_panel(); KeyAction::Continue }
        KeyCode::Char('>') => { state.grow_editor_panel(); KeyAction::Continue }

        KeyCode::Char('i') => {
            state.mode = Mode::Insert;
            state.focus = PanelFocus::Editor;
            state.editor_scroll = u16::MAX;
            KeyAction::Continue
        }
        KeyCode::Char('w') => KeyAction::Save,

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            if state.dirty {
                state.mode = Mode::ConfirmQuit;
                KeyAction::Continue
            } else {
                KeyAction::Quit
            }
        }

        _ => KeyAction::Continue,
    }
}

/// Polish and review keys: `p`, `a`, `u`, `A`, `c`.
///
/// Returns `None` when the key should fall through to the rest of the
/// Normal handler.
fn handle_review_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    match key.code {
        KeyCode::Char('p') => state.request_polish(),
        KeyCode::Char('a') => state.apply_selected(),
        KeyCode::Char('u') => state.undo_selected(),
        KeyCode::Char('A') => state.apply_all(),
        KeyCode::Char('c') => {
            return Some(match state.close_review() {
                Some(review) => KeyAction::RecordReview(review),
                None => KeyAction::Continue,
            });
        }
        _ => return None,
    }
    Some(KeyAction::Continue)
}

/// j / k / g / G and the Ctrl page keys. `None` when not a scroll key.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') => state.scroll_top(),
        KeyCode::Char('G') => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('f') if ctrl => state.full_page_down(),
        KeyCode::Char('b') if ctrl => state.full_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// ConfirmQuit mode
// ---------------------------------------------------------------------------

/// `y` quits without saving, `n` / `Esc` returns to Normal.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Append-style editing of the selected field. `Esc` leaves Insert mode.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Enter => state.insert_char('\n'),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.insert_char(c);
        }
        _ => return KeyAction::Continue,
    }
    state.editor_scroll = u16::MAX;
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses the panel under the cursor; the wheel scrolls the
/// focused panel (or the help overlay) by 3 rows.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => focus_at(mouse.column, mouse.row, state),
        MouseEventKind::ScrollUp if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        MouseEventKind::ScrollDown if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}

/// Collapsed (zero-width) panels cannot receive focus by click.
fn focus_at(col: u16, row: u16, state: &mut AppState) {
    let pos = Position { x: col, y: row };
    let [left, center, right] = state.panel_rects;

    if left.width > 0 && left.contains(pos) {
        state.focus = PanelFocus::Fields;
    } else if center.width > 0 && center.contains(pos) {
        state.focus = PanelFocus::Editor;
    } else if right.width > 0 && right.contains(pos) {
        state.focus = PanelFocus::Review;
    }
}
