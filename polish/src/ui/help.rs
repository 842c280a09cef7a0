//! Help overlay renderer.
//!
//! Drawn inside the same `terminal.draw()` closure as the panels: `Clear`
//! erases the area first, then a bordered `Paragraph` is drawn on top.

use ratatui::{
    Frame,
    layout::Constraint,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal, scrolled by `help_scroll`.
/// Skipped below 40 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" 帮助  j/k 滚动，? 或 Esc 关闭 ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("导航"),
        Line::from("  j / k         下移 / 上移"),
        Line::from("  g / G         跳到顶部 / 底部"),
        Line::from("  Ctrl-d / u    下翻 / 上翻半页"),
        Line::from("  Ctrl-f / b    下翻 / 上翻整页"),
        Line::from("  H / L         切换到左 / 右侧面板"),
        Line::from("  < / >         缩小 / 放大编辑面板"),
        Line::from(""),
        Line::from("润色与审阅"),
        Line::from("  p             AI 润色当前字段"),
        Line::from("  a             应用选中的修改"),
        Line::from("  u             撤销选中的修改"),
        Line::from("  A             应用全部修改"),
        Line::from("  c             关闭审阅"),
        Line::from(""),
        Line::from("编辑"),
        Line::from("  i             编辑当前字段 (在末尾追加)"),
        Line::from("  Esc           退出编辑"),
        Line::from("  w             保存草稿"),
        Line::from(""),
        Line::from("通用"),
        Line::from("  ?             打开 / 关闭帮助"),
        Line::from("  q             退出 (有未保存修改时需确认)"),
    ])
}
