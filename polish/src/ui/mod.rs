//! UI rendering for polish.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each
//! panel has its own module.

mod layout;
pub mod editor_view;
pub mod field_list;
pub mod help;
pub mod keybindings;
pub mod review_view;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame.
///
/// Viewport heights and panel rects are written back into `state` so the
/// next keypress or click can use them; the one-frame lag is not visible.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [left, center, right, status_bar] = compute_layout(frame, state);

    state.field_list_viewport_height = inner_rect(left).height;
    state.editor_viewport_height = inner_rect(center).height;
    state.review_viewport_height = inner_rect(right).height;
    state.panel_rects = [left, center, right];

    if left.width > 0 {
        field_list::render_field_list(frame, left, state, theme);
    }
    if center.width > 0 {
        editor_view::render_editor(frame, center, state, theme);
    }
    if right.width > 0 {
        review_view::render_review(frame, right, state, theme);
    }

    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
