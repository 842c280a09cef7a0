//! Field list panel: the three proposal fields with character counts.
//!
//! A field with a polish request in flight is marked with `…`; the field of
//! the open review is marked with `●`.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use polish_core::FieldType;

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

pub fn render_field_list(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Fields;
    let block = panel_block(format!("字段 · {}", state.draft.title), is_focused, theme);

    let items: Vec<ListItem> = FieldType::ALL
        .iter()
        .map(|&field| field_item(field, state, theme))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut state.field_list_state);
}

fn field_item(field: FieldType, state: &AppState, theme: &Theme) -> ListItem<'static> {
    let marker = if state.polishing == Some(field) {
        Span::styled("… ", Style::default().fg(theme.field_polishing))
    } else if state.review.as_ref().is_some_and(|r| r.field_type == field) {
        Span::styled("● ", Style::default().fg(theme.segment_applied))
    } else {
        Span::raw("  ")
    };
    let count = state.draft.field(field).chars().count();
    ListItem::new(Line::from(vec![
        marker,
        Span::raw(field.label()),
        Span::styled(format!("  {count} 字"), Style::default().fg(theme.field_count)),
    ]))
}
