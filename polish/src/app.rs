//! Central application state for polish.
//!
//! Owns the draft being edited, the open review (if any) and all UI state:
//! mode, focus, per-panel scroll offsets and viewport heights, panel widths.
//! No rendering lives here; the render module reads it and the keybinding
//! dispatcher mutates it.

use crossbeam_channel::Sender;
use log::{debug, info};
use polish_core::validate::check_polish_input;
use polish_core::{DiffOptions, Draft, FieldType, Outcome, PolishResult, Segment};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

use crate::polish::types::{PolishRequest, PolishResponse};

/// Editor mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing into the selected field.
    Insert,
    HelpOverlay,
    /// Quit-confirmation dialog shown when the draft has unsaved edits.
    ConfirmQuit,
}

/// Which panel currently has keyboard focus.
///
/// Cycle order: `Fields` → `Editor` → `Review` → `Fields`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel: the three form fields.
    #[default]
    Fields,
    /// Centre panel: live text of the selected field.
    Editor,
    /// Right panel: segments of the open review.
    Review,
}

impl PanelFocus {
    pub fn prev(self) -> Self {
        match self {
            PanelFocus::Fields => PanelFocus::Review,
            PanelFocus::Editor => PanelFocus::Fields,
            PanelFocus::Review => PanelFocus::Editor,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PanelFocus::Fields => PanelFocus::Editor,
            PanelFocus::Editor => PanelFocus::Review,
            PanelFocus::Review => PanelFocus::Fields,
        }
    }
}

/// All mutable state passed through every render cycle.
pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,

    /// The proposal being edited. Field text here is the live text that
    /// segments are applied to.
    pub draft: Draft,
    /// Set when the draft has edits not yet written to the database.
    pub dirty: bool,

    /// The open review, at most one at a time.
    pub review: Option<PolishResult>,
    /// Field whose polish request is in flight.
    pub polishing: Option<FieldType>,
    /// Last status message shown in the status bar.
    pub message: Option<String>,
    /// Advances on every tick while a polish request is in flight.
    pub spinner: usize,

    pub field_list_state: ListState,
    pub segment_list_state: ListState,
    pub editor_scroll: u16,
    /// Row offset of the review panel; follows the selected segment.
    pub review_scroll: u16,
    pub help_scroll: u16,

    /// Inner heights cached after each render, used by page scrolling.
    pub field_list_viewport_height: u16,
    pub editor_viewport_height: u16,
    pub review_viewport_height: u16,
    /// Outer rects of the three panels from the last render, for mouse focus.
    pub panel_rects: [Rect; 3],

    pub left_pct: u16,
    pub center_pct: u16,
    pub right_pct: u16,

    /// Request channel to the polish worker. `None` in tests.
    pub polish_tx: Option<Sender<PolishRequest>>,
    pub diff_options: DiffOptions,
}

impl AppState {
    pub fn new(draft: Draft, diff_options: DiffOptions) -> Self {
        let mut field_list_state = ListState::default();
        field_list_state.select(Some(0));
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            draft,
            dirty: false,
            review: None,
            polishing: None,
            message: None,
            spinner: 0,
            field_list_state,
            segment_list_state: ListState::default(),
            editor_scroll: 0,
            review_scroll: 0,
            help_scroll: 0,
            field_list_viewport_height: 0,
            editor_viewport_height: 0,
            review_viewport_height: 0,
            panel_rects: [Rect::default(); 3],
            left_pct: 20,
            center_pct: 45,
            right_pct: 35,
            polish_tx: None,
            diff_options,
        }
    }

    /// The field highlighted in the field list.
    pub fn selected_field(&self) -> FieldType {
        self.field_list_state
            .selected()
            .and_then(|i| FieldType::ALL.get(i).copied())
            .unwrap_or_default()
    }

    pub fn select_field(&mut self, field: FieldType) {
        let idx = FieldType::ALL.iter().position(|f| *f == field).unwrap_or(0);
        self.field_list_state.select(Some(idx));
        self.editor_scroll = 0;
    }

    /// The segment highlighted in the review panel.
    pub fn selected_segment(&self) -> Option<&Segment> {
        let review = self.review.as_ref()?;
        review.segments().get(self.segment_list_state.selected()?)
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Fields => {
                let last = FieldType::ALL.len() - 1;
                let next = self.field_list_state.selected().map_or(0, |i| i + lines as usize);
                self.select_field(FieldType::ALL[next.min(last)]);
            }
            PanelFocus::Editor => {
                self.editor_scroll = self.editor_scroll.saturating_add(lines);
            }
            PanelFocus::Review => self.segment_list_state.scroll_down_by(lines),
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Fields => {
                let prev = self
                    .field_list_state
                    .selected()
                    .map_or(0, |i| i.saturating_sub(lines as usize));
                self.select_field(FieldType::ALL[prev]);
            }
            PanelFocus::Editor => {
                self.editor_scroll = self.editor_scroll.saturating_sub(lines);
            }
            PanelFocus::Review => self.segment_list_state.scroll_up_by(lines),
        }
    }

    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Fields => self.select_field(FieldType::Brief),
            PanelFocus::Editor => self.editor_scroll = 0,
            PanelFocus::Review => self.segment_list_state.select_first(),
        }
    }

    /// For the editor this sets `u16::MAX`; the renderer clamps it.
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Fields => self.select_field(FieldType::Suggest),
            PanelFocus::Editor => self.editor_scroll = u16::MAX,
            PanelFocus::Review => self.segment_list_state.select_last(),
        }
    }

    fn focused_viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Fields => self.field_list_viewport_height,
            PanelFocus::Editor => self.editor_viewport_height,
            PanelFocus::Review => self.review_viewport_height,
        }
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down((self.focused_viewport_height() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.focused_viewport_height() / 2).max(1));
    }

    pub fn full_page_down(&mut self) {
        self.scroll_down(self.focused_viewport_height().max(1));
    }

    pub fn full_page_up(&mut self) {
        self.scroll_up(self.focused_viewport_height().max(1));
    }

    /// Moves 5% of width from the editor panel to the side panels; the
    /// editor never drops below 20%.
    pub fn shrink_editor_panel(&mut self) {
        const MIN_CENTER: u16 = 20;
        const STEP: u16 = 5;
        if self.center_pct <= MIN_CENTER {
            return;
        }
        let transfer = STEP.min(self.center_pct - MIN_CENTER);
        self.center_pct -= transfer;
        let left_gain = transfer / 2;
        self.left_pct += left_gain;
        self.right_pct += transfer - left_gain;
    }

    /// Pulls up to 5% of width from the side panels into the editor; the
    /// editor never exceeds 80% and side panels keep at least 5%.
    pub fn grow_editor_panel(&mut self) {
        const MAX_CENTER: u16 = 80;
        const MIN_SIDE: u16 = 5;
        const STEP: u16 = 5;
        if self.center_pct >= MAX_CENTER {
            return;
        }
        let transfer = STEP.min(MAX_CENTER - self.center_pct);
        let left_give = (transfer / 2).min(self.left_pct.saturating_sub(MIN_SIDE));
        let right_give = (transfer - transfer / 2).min(self.right_pct.saturating_sub(MIN_SIDE));
        self.left_pct -= left_give;
        self.right_pct -= right_give;
        self.center_pct += left_give + right_give;
    }

    // -----------------------------------------------------------------------
    // Polish lifecycle
    // -----------------------------------------------------------------------

    /// Sends the selected field to the polish worker.
    ///
    /// Refuses while another request is in flight and when the field fails
    /// pre-flight validation; either way the reason lands in `message`.
    pub fn request_polish(&mut self) {
        let field = self.selected_field();
        if let Some(busy) = self.polishing {
            self.message = Some(format!("正在润色{}，请稍候", busy.label()));
            return;
        }
        let text = self.draft.field(field).to_owned();
        if let Err(e) = check_polish_input(field, &text) {
            self.message = Some(e.to_string());
            return;
        }
        let Some(tx) = &self.polish_tx else {
            self.message = Some("AI 润色不可用".to_owned());
            return;
        };
        if tx.send(PolishRequest { field, text }).is_err() {
            self.message = Some("AI 润色不可用".to_owned());
            return;
        }
        self.polishing = Some(field);
        self.spinner = 0;
        self.message = Some(format!("正在润色{}…", field.label()));
    }

    /// Handles a worker reply.
    ///
    /// On success a new review replaces the open one, which is returned so
    /// the caller can record it as closed. On failure the open review is kept.
    pub fn apply_polish_response(&mut self, response: PolishResponse) -> Option<PolishResult> {
        self.polishing = None;
        let revised = match response.result {
            Ok(revised) => revised,
            Err(e) => {
                self.message = Some(e.to_string());
                return None;
            }
        };

        let review = PolishResult::new(response.field, &response.original, &revised, self.diff_options);
        let changes = review.store.change_count();
        info!("review opened for {}: {} segments, {} changed", response.field, review.store.len(), changes);

        self.message = Some(if changes == 0 {
            format!("{}无需修改", response.field.label())
        } else {
            format!("{}润色完成，共 {changes} 处修改", response.field.label())
        });
        self.select_field(response.field);
        self.segment_list_state = ListState::default();
        self.review_scroll = 0;
        let first_change = review.segments().iter().position(|s| s.has_changes);
        self.segment_list_state.select(first_change.or(Some(0)));
        self.focus = PanelFocus::Review;

        let superseded = self.review.replace(review);
        if superseded.is_some() {
            debug!("previous review discarded");
        }
        superseded
    }

    /// Applies the highlighted segment to the live field text.
    pub fn apply_selected(&mut self) {
        let Some((id, insertion)) =
            self.selected_segment().map(|s| (s.id.clone(), s.is_insertion()))
        else {
            return;
        };
        let Some(review) = self.review.as_mut() else {
            return;
        };
        let field = review.field_type;
        self.message = Some(match review.store.apply(self.draft.field(field), &id) {
            Ok(Outcome::Changed(text)) => {
                *self.draft.field_mut(field) = text;
                self.dirty = true;
                "已应用修改".to_owned()
            }
            Ok(Outcome::Unchanged) if insertion => "新增句无对应原文，请手动添加".to_owned(),
            Ok(Outcome::Unchanged) => "原文已被改动，未找到对应内容".to_owned(),
            Err(e) => e.to_string(),
        });
    }

    /// Reverts the highlighted segment in the live field text.
    pub fn undo_selected(&mut self) {
        let Some(id) = self.selected_segment().map(|s| s.id.clone()) else {
            return;
        };
        let Some(review) = self.review.as_mut() else {
            return;
        };
        let field = review.field_type;
        self.message = Some(match review.store.undo(self.draft.field(field), &id) {
            Ok(Outcome::Changed(text)) => {
                *self.draft.field_mut(field) = text;
                self.dirty = true;
                "已撤销修改".to_owned()
            }
            Ok(Outcome::Unchanged) => "已应用的内容已被改动，无法撤销".to_owned(),
            Err(e) => e.to_string(),
        });
    }

    /// Applies every unapplied changed segment of the open review.
    pub fn apply_all(&mut self) {
        let Some(review) = self.review.as_mut() else {
            return;
        };
        let field = review.field_type;
        let (text, applied) = review.store.apply_all(self.draft.field(field));
        if applied > 0 {
            *self.draft.field_mut(field) = text;
            self.dirty = true;
        }
        self.message = Some(format!("已应用 {applied} 处修改"));
    }

    /// Closes the open review and hands it back for recording.
    pub fn close_review(&mut self) -> Option<PolishResult> {
        let review = self.review.take()?;
        self.segment_list_state = ListState::default();
        if self.focus == PanelFocus::Review {
            self.focus = PanelFocus::Editor;
        }
        self.message = Some(format!(
            "审阅已关闭，应用了 {} 处修改",
            review.store.applied_count()
        ));
        Some(review)
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Appends `c` to the selected field.
    pub fn insert_char(&mut self, c: char) {
        let field = self.selected_field();
        self.draft.field_mut(field).push(c);
        self.dirty = true;
    }

    /// Removes the last character of the selected field.
    pub fn backspace(&mut self) {
        let field = self.selected_field();
        if self.draft.field_mut(field).pop().is_some() {
            self.dirty = true;
        }
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
        self.message = Some("草稿已保存".to_owned());
    }

    pub fn on_tick(&mut self) {
        if self.polishing.is_some() {
            self.spinner = self.spinner.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polish_core::PolishError;

    fn draft(brief: &str) -> Draft {
        Draft {
            id: "d-1".to_owned(),
            title: "食堂".to_owned(),
            brief: brief.to_owned(),
            analysis: String::new(),
            suggest: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn response(original: &str, revised: &str) -> PolishResponse {
        PolishResponse {
            field: FieldType::Brief,
            original: original.to_owned(),
            result: Ok(revised.to_owned()),
        }
    }

    #[test]
    fn polish_request_is_sent_once_until_reply() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut state = AppState::new(draft("学校食堂饭菜太贵，学生负担重。"), DiffOptions::default());
        state.polish_tx = Some(tx);

        state.request_polish();
        state.request_polish();

        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(state.polishing, Some(FieldType::Brief));
    }

    #[test]
    fn short_field_is_not_sent() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut state = AppState::new(draft("太贵。"), DiffOptions::default());
        state.polish_tx = Some(tx);

        state.request_polish();

        assert!(rx.try_recv().is_err());
        assert_eq!(state.polishing, None);
        assert_eq!(state.message.as_deref(), Some("案由内容太少，无需润色"));
    }

    #[test]
    fn apply_then_undo_restores_field() {
        let original = "学校食堂饭菜太贵。";
        let mut state = AppState::new(draft(original), DiffOptions::default());
        state.apply_polish_response(response(original, "学校食堂饭菜价格偏高。"));

        assert_eq!(state.focus, PanelFocus::Review);
        state.apply_selected();
        assert_eq!(state.draft.brief, "学校食堂饭菜价格偏高。");
        assert!(state.dirty);

        state.undo_selected();
        assert_eq!(state.draft.brief, original);
    }

    #[test]
    fn new_review_supersedes_old_one() {
        let original = "学校食堂饭菜太贵。";
        let mut state = AppState::new(draft(original), DiffOptions::default());
        assert!(state.apply_polish_response(response(original, "食堂太贵。")).is_none());

        let superseded = state.apply_polish_response(response(original, "学校食堂价格偏高。"));

        assert_eq!(superseded.map(|r| r.revised_full).as_deref(), Some("食堂太贵。"));
        assert_eq!(state.review.as_ref().map(|r| r.revised_full.as_str()), Some("学校食堂价格偏高。"));
    }

    #[test]
    fn failed_polish_keeps_open_review() {
        let original = "学校食堂饭菜太贵。";
        let mut state = AppState::new(draft(original), DiffOptions::default());
        state.apply_polish_response(response(original, "学校食堂饭菜价格偏高。"));

        let failed = PolishResponse {
            field: FieldType::Brief,
            original: original.to_owned(),
            result: Err(PolishError::Rejected("AI 服务繁忙".to_owned())),
        };
        assert!(state.apply_polish_response(failed).is_none());
        assert!(state.review.is_some());
        assert_eq!(state.message.as_deref(), Some("AI 服务繁忙"));
    }

    #[test]
    fn apply_all_and_close_review() {
        let original = "食堂饭菜太贵。宿舍很好。图书馆太小。";
        let mut state = AppState::new(draft(original), DiffOptions::default());
        state.apply_polish_response(response(original, "食堂饭菜价格偏高。宿舍很好。图书馆空间太小。"));

        state.apply_all();
        assert_eq!(state.draft.brief, "食堂饭菜价格偏高。宿舍很好。图书馆空间太小。");

        let closed = state.close_review().expect("review was open");
        assert_eq!(closed.store.applied_count(), 2);
        assert!(state.review.is_none());
        assert_eq!(state.focus, PanelFocus::Editor);
    }

    #[test]
    fn applying_added_sentence_leaves_field_alone() {
        let original = "食堂饭菜太贵。";
        let mut state = AppState::new(draft(original), DiffOptions::default());
        state.apply_polish_response(response(original, "食堂饭菜太贵。建议降价。"));
        state.segment_list_state.select(Some(1));

        state.apply_selected();

        assert_eq!(state.draft.brief, original);
        assert!(!state.dirty);
        assert_eq!(state.message.as_deref(), Some("新增句无对应原文，请手动添加"));
    }

    #[test]
    fn editing_appends_to_selected_field() {
        let mut state = AppState::new(draft("甲"), DiffOptions::default());
        state.insert_char('乙');
        state.backspace();
        state.backspace();
        state.backspace();
        assert_eq!(state.draft.brief, "");
        assert!(state.dirty);
    }

    #[test]
    fn editor_panel_resize_respects_bounds() {
        let mut state = AppState::new(draft(""), DiffOptions::default());
        for _ in 0..20 {
            state.grow_editor_panel();
        }
        assert!(state.center_pct <= 80);
        assert_eq!(state.left_pct + state.center_pct + state.right_pct, 100);
        for _ in 0..20 {
            state.shrink_editor_panel();
        }
        assert_eq!(state.center_pct, 20);
        assert_eq!(state.left_pct + state.center_pct + state.right_pct, 100);
    }
}
