//! Responsive 3-panel layout for polish.
//!
//! Pure layout arithmetic, recomputed inside every `terminal.draw()`.
//!
//! At `>= 100` columns all three panels are visible with widths driven by
//! `AppState.left_pct / center_pct / right_pct`. Narrower terminals show only
//! the focused panel at full width.
//!
//! `Spacing::Overlap(1)` combined with `MergeStrategy::Fuzzy` makes adjacent
//! panel borders share a single column.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;

const WIDE_LAYOUT_MIN_COLS: u16 = 100;
const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Returns `[left, center, right, status_bar]` for the current frame.
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 4] {
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let constraints = if frame.area().width >= WIDE_LAYOUT_MIN_COLS {
        [
            Constraint::Percentage(state.left_pct),
            Constraint::Percentage(state.center_pct),
            Constraint::Percentage(state.right_pct),
        ]
    } else {
        let width = |panel: PanelFocus| {
            if state.focus == panel { Constraint::Fill(1) } else { Constraint::Length(0) }
        };
        [width(PanelFocus::Fields), width(PanelFocus::Editor), width(PanelFocus::Review)]
    };

    let [left, center, right] =
        main_area.layout(&Layout::horizontal(constraints).spacing(Spacing::Overlap(1)));

    [left, center, right, status_bar]
}

/// Inner `Rect` of a panel after removing the 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Rows `lines` occupy when wrapped at `width`. Approximate: breaks at any
/// column rather than at word boundaries, which matches CJK text.
pub fn wrapped_rows(lines: &[Line], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines.iter().map(|l| l.width().div_ceil(width).max(1)).sum()
}

/// Bordered `Block` for a panel: thick and highlighted when focused.
///
/// `MergeStrategy::Fuzzy` because `Exact` produces wrong junctions when
/// `Thick` and `Plain` borders meet.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar: mode, change count of the open review,
/// polishing indicator and the last message.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::ConfirmQuit | Mode::HelpOverlay => {
            (" NORMAL ", theme.status_mode_normal)
        }
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];

    if let Some(review) = &state.review {
        spans.push(Span::raw(format!(
            " {} · {} 处修改 ",
            review.field_type.label(),
            review.store.change_count()
        )));
    }

    if let Some(field) = state.polishing {
        let frame_char = SPINNER[state.spinner % SPINNER.len()];
        spans.push(Span::styled(
            format!(" {frame_char} 润色{}中 ", field.label()),
            Style::default().fg(theme.field_polishing),
        ));
    }

    if state.mode == Mode::ConfirmQuit {
        spans.push(Span::styled(
            " 草稿未保存，确定退出？(y/n) ",
            Style::default().fg(theme.status_message).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(message) = &state.message {
        spans.push(Span::styled(format!(" {message}"), Style::default().fg(theme.status_message)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_rows_counts_wide_chars() {
        // Each CJK char is two columns wide.
        let lines = vec![Line::raw("学校食堂饭菜太贵"), Line::raw("")];
        assert_eq!(wrapped_rows(&lines, 10), 3);
        assert_eq!(wrapped_rows(&lines, 16), 2);
    }
}
