//! Review panel: one entry per segment of the open review.
//!
//! Each entry is a header line (ordinal and state) followed by the word diff:
//! added runs in `diff_added`, removed runs struck through in `diff_removed`.
//! Segments without changes show their text dimmed. The selected entry's
//! header is highlighted and kept inside the viewport.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use polish_core::{ChangeKind, Segment};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block, wrapped_rows};

pub fn render_review(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Review;
    let inner = inner_rect(area);

    let Some(review) = state.review.as_ref() else {
        frame.render_widget(panel_block("审阅", is_focused, theme), area);
        let hint = if state.polishing.is_some() { "润色中…" } else { "按 p 润色当前字段" };
        frame.render_widget(
            Paragraph::new(Line::styled(hint, Style::default().fg(theme.segment_unchanged))),
            inner,
        );
        return;
    };

    let title = format!(
        "审阅 · {} ({} 处修改)",
        review.field_type.label(),
        review.store.change_count()
    );
    frame.render_widget(panel_block(title, is_focused, theme), area);

    let segments = review.segments();
    if segments.is_empty() {
        frame.render_widget(Paragraph::new(Line::raw("(无内容)")), inner);
        return;
    }

    // ListState does not clamp until a List renders it; this panel is a
    // Paragraph, so clamp here.
    let selected = state
        .segment_list_state
        .selected()
        .map_or(0, |i| i.min(segments.len() - 1));

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_row = 0usize;
    for (i, segment) in segments.iter().enumerate() {
        let is_selected = i == selected;
        if is_selected {
            selected_row = wrapped_rows(&lines, inner.width);
        }
        lines.push(header_line(i, segment, is_selected, theme));
        lines.push(diff_line(segment, theme));
        lines.push(Line::raw(""));
    }

    state.segment_list_state.select(Some(selected));
    state.review_scroll = scroll_to_show(state.review_scroll, selected_row, inner.height);

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((state.review_scroll, 0));
    frame.render_widget(paragraph, inner);
}

fn header_line(index: usize, segment: &Segment, is_selected: bool, theme: &Theme) -> Line<'static> {
    let (marker, label, color) = if !segment.has_changes {
        (" ", "无修改", theme.segment_unchanged)
    } else if segment.applied {
        ("✓", "已应用", theme.segment_applied)
    } else if segment.is_insertion() {
        ("+", "新增", theme.diff_added)
    } else {
        ("•", "待处理", theme.status_message)
    };

    let mut style = Style::default().fg(color);
    if is_selected {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    Line::from(vec![
        Span::styled(format!("{marker} #{} ", index + 1), style),
        Span::styled(label, Style::default().fg(color)),
    ])
}

fn diff_line(segment: &Segment, theme: &Theme) -> Line<'static> {
    if !segment.has_changes {
        return Line::styled(
            segment.original_before_apply.clone(),
            Style::default().fg(theme.segment_unchanged),
        );
    }
    let spans: Vec<Span> = segment
        .diff
        .iter()
        .map(|change| {
            let style = match change.kind {
                ChangeKind::Same => Style::default().fg(theme.diff_same),
                ChangeKind::Added => Style::default().fg(theme.diff_added).add_modifier(Modifier::BOLD),
                ChangeKind::Removed => Style::default()
                    .fg(theme.diff_removed)
                    .add_modifier(Modifier::CROSSED_OUT),
            };
            Span::styled(change.text.clone(), style)
        })
        .collect();
    Line::from(spans)
}

/// Adjusts `scroll` so that `row` is inside a viewport of `height` rows,
/// leaving room for the entry's diff line below the header.
fn scroll_to_show(scroll: u16, row: usize, height: u16) -> u16 {
    let row = u16::try_from(row).unwrap_or(u16::MAX);
    if row < scroll {
        row
    } else if height > 2 && row.saturating_add(2) >= scroll.saturating_add(height) {
        row.saturating_add(3).saturating_sub(height)
    } else {
        scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_follows_selection_both_ways() {
        assert_eq!(scroll_to_show(10, 4, 10), 4);
        assert_eq!(scroll_to_show(0, 3, 10), 0);
        assert_eq!(scroll_to_show(0, 12, 10), 5);
    }
}
