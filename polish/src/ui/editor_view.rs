//! Editor panel: live text of the selected field.
//!
//! The text is wrapped and scrolled with `editor_scroll`. In Insert mode a
//! block cursor is drawn after the last character, since editing appends.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block, wrapped_rows};

pub fn render_editor(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let field = state.selected_field();
    let is_focused = state.focus == PanelFocus::Editor;
    let title = match state.mode {
        Mode::Insert => format!("{} (编辑中，Esc 退出)", field.label()),
        _ => field.label().to_owned(),
    };
    let block = panel_block(title, is_focused || state.mode == Mode::Insert, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let body = state.draft.field(field);
    let mut lines: Vec<Line> = if body.is_empty() && state.mode != Mode::Insert {
        vec![Line::styled(
            "(空，按 i 输入内容)",
            Style::default().fg(theme.segment_unchanged),
        )]
    } else {
        body.split('\n').map(|l| Line::from(l.to_owned())).collect()
    };

    if state.mode == Mode::Insert {
        let cursor = Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED));
        if let Some(last) = lines.last_mut() {
            last.push_span(cursor);
        } else {
            lines.push(Line::from(cursor));
        }
    }

    // Clamp the scroll offset to the wrapped height so `G` lands on the last page.
    let total = u16::try_from(wrapped_rows(&lines, inner.width)).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(inner.height);
    state.editor_scroll = state.editor_scroll.min(max_scroll);

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((state.editor_scroll, 0));
    frame.render_widget(paragraph, inner);
}
