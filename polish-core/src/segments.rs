//! Segment list for one review and the apply/undo substitutions it drives.
//!
//! Apply keys on the *first* verbatim occurrence of a segment's current text
//! inside the live field, so a sentence that appears twice, or one that occurs
//! inside an already-applied revision, resolves to whichever comes first. Undo
//! reverts at the offset the apply used, falling back to the first occurrence
//! when edits have moved the text.

use log::debug;

use crate::align::align_sentences;
use crate::error::SegmentError;
use crate::segmenter::split_sentences;
use crate::types::{ChangeKind, DiffChange, DiffOptions, FieldType, Segment};
use crate::word_diff::diff_words;

/// Result of an apply or undo that passed its preconditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The substitution happened; carries the new field text.
    Changed(String),
    /// The text to replace was not found; field text and segment state are untouched.
    Unchanged,
}

impl Outcome {
    /// Returns the field text after the operation, falling back to `live`.
    pub fn into_text(self, live: &str) -> String {
        match self {
            Outcome::Changed(text) => text,
            Outcome::Unchanged => live.to_owned(),
        }
    }
}

/// Builds the segment list for `original` against `revised`.
pub fn create_segments(original: &str, revised: &str, options: DiffOptions) -> Vec<Segment> {
    let original_sentences = split_sentences(original);
    let revised_sentences = split_sentences(revised);

    align_sentences(&original_sentences, &revised_sentences)
        .into_iter()
        .enumerate()
        .map(|(n, pair)| {
            let diff = if pair.original.is_empty() {
                vec![DiffChange::added(pair.revised)]
            } else {
                diff_words(pair.original, pair.revised, options)
            };
            let has_changes = diff.iter().any(|c| c.kind != ChangeKind::Same);
            Segment {
                id: format!("seg-{n}"),
                original_current: pair.original.to_owned(),
                original_before_apply: pair.original.to_owned(),
                revised: pair.revised.to_owned(),
                diff,
                has_changes,
                applied: false,
                applied_at: None,
            }
        })
        .collect()
}

/// Ordered segments of one review, owned by whoever hosts the review panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentStore {
    segments: Vec<Segment>,
}

impl SegmentStore {
    pub fn new(original: &str, revised: &str, options: DiffOptions) -> Self {
        let segments = create_segments(original, revised, options);
        debug!(
            "created {} segments ({} with changes)",
            segments.len(),
            segments.iter().filter(|s| s.has_changes).count()
        );
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments whose diff is not all `Same` (the "N 处修改" count).
    pub fn change_count(&self) -> usize {
        self.segments.iter().filter(|s| s.has_changes).count()
    }

    pub fn applied_count(&self) -> usize {
        self.segments.iter().filter(|s| s.applied).count()
    }

    /// Substitutes segment `id`'s revision into `live`.
    ///
    /// Replaces the first occurrence of the segment's current text with its
    /// revised text and remembers the byte offset of the substitution. When
    /// the current text is not found, or the segment is an insertion with no
    /// original text to anchor on, the result is [`Outcome::Unchanged`] and
    /// the segment stays unapplied.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::NotFound`] for an unknown id and
    /// [`SegmentError::AlreadyApplied`] if the segment is already applied.
    pub fn apply(&mut self, live: &str, id: &str) -> Result<Outcome, SegmentError> {
        let segment = self.find_mut(id)?;
        if segment.applied {
            return Err(SegmentError::AlreadyApplied(id.to_owned()));
        }
        if segment.original_current.is_empty() {
            debug!("apply {id}: insertion has no anchor in field, skipped");
            return Ok(Outcome::Unchanged);
        }

        let Some(at) = live.find(segment.original_current.as_str()) else {
            debug!("apply {id}: original text not found in field, skipped");
            return Ok(Outcome::Unchanged);
        };
        let text = replace_at(live, at, segment.original_current.len(), &segment.revised);
        segment.applied = true;
        segment.applied_at = Some(at);
        segment.original_current = segment.revised.clone();
        debug!("apply {id}: ok at byte {at}");
        Ok(Outcome::Changed(text))
    }

    /// Reverts segment `id` in `live` to the text it had before it was applied.
    ///
    /// The revision is looked for first at the offset where it was applied,
    /// then at its first occurrence. When it cannot be found the result is
    /// [`Outcome::Unchanged`] and the segment stays applied.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::NotFound`] for an unknown id and
    /// [`SegmentError::NotApplied`] if the segment is not applied.
    pub fn undo(&mut self, live: &str, id: &str) -> Result<Outcome, SegmentError> {
        let segment = self.find_mut(id)?;
        if !segment.applied {
            return Err(SegmentError::NotApplied(id.to_owned()));
        }

        let current = segment.original_current.as_str();
        let at = segment
            .applied_at
            .filter(|&at| live.get(at..).is_some_and(|rest| rest.starts_with(current)))
            .or_else(|| live.find(current));
        let Some(at) = at else {
            debug!("undo {id}: applied text not found in field, skipped");
            return Ok(Outcome::Unchanged);
        };

        let text = replace_at(live, at, current.len(), &segment.original_before_apply);
        segment.applied = false;
        segment.applied_at = None;
        segment.original_current = segment.original_before_apply.clone();
        debug!("undo {id}: ok at byte {at}");
        Ok(Outcome::Changed(text))
    }

    /// Applies every unapplied segment with changes, in order.
    ///
    /// Returns the final text and how many segments were applied; segments
    /// whose text is no longer found are skipped.
    pub fn apply_all(&mut self, live: &str) -> (String, usize) {
        let ids: Vec<String> = self
            .segments
            .iter()
            .filter(|s| s.has_changes && !s.applied && !s.is_insertion())
            .map(|s| s.id.clone())
            .collect();

        let mut text = live.to_owned();
        let mut applied = 0;
        for id in ids {
            if let Ok(Outcome::Changed(next)) = self.apply(&text, &id) {
                text = next;
                applied += 1;
            }
        }
        (text, applied)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Segment, SegmentError> {
        self.segments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SegmentError::NotFound(id.to_owned()))
    }
}

/// Replaces `len` bytes of `haystack` starting at byte `at` with `to`.
fn replace_at(haystack: &str, at: usize, len: usize, to: &str) -> String {
    let mut out = String::with_capacity(haystack.len() - len + to.len());
    out.push_str(&haystack[..at]);
    out.push_str(to);
    out.push_str(&haystack[at + len..]);
    out
}

/// One review session: the field under review, both full texts, and its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolishResult {
    pub field_type: FieldType,
    pub original_full: String,
    pub revised_full: String,
    pub store: SegmentStore,
}

impl PolishResult {
    pub fn new(field_type: FieldType, original: &str, revised: &str, options: DiffOptions) -> Self {
        Self {
            field_type,
            original_full: original.to_owned(),
            revised_full: revised.to_owned(),
            store: SegmentStore::new(original, revised, options),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        self.store.segments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(original: &str, revised: &str) -> SegmentStore {
        SegmentStore::new(original, revised, DiffOptions::default())
    }

    #[test]
    fn segments_get_ordinal_ids_and_start_unapplied() {
        let s = store("一。二。", "一！二。");
        let ids: Vec<&str> = s.segments().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["seg-0", "seg-1"]);
        assert!(s.segments().iter().all(|s| !s.applied));
        assert!(s.segments().iter().all(|s| s.original_before_apply == s.original_current));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let mut s = store("一。", "二。");
        assert_eq!(s.apply("一。", "seg-9"), Err(SegmentError::NotFound("seg-9".into())));
        assert_eq!(s.undo("一。", "seg-9"), Err(SegmentError::NotFound("seg-9".into())));
    }

    #[test]
    fn wrong_state_is_rejected() {
        let mut s = store("一。", "二。");
        assert_eq!(s.undo("一。", "seg-0"), Err(SegmentError::NotApplied("seg-0".into())));
        let text = s.apply("一。", "seg-0").unwrap().into_text("一。");
        assert_eq!(text, "二。");
        assert_eq!(s.apply(&text, "seg-0"), Err(SegmentError::AlreadyApplied("seg-0".into())));
    }

    #[test]
    fn apply_replaces_first_occurrence_only() {
        let mut s = store("重复。", "改写。");
        let outcome = s.apply("重复。重复。", "seg-0").unwrap();
        assert_eq!(outcome, Outcome::Changed("改写。重复。".into()));
    }

    #[test]
    fn apply_missing_text_is_a_no_op() {
        let mut s = store("原句。", "新句。");
        assert_eq!(s.apply("用户已经改过了。", "seg-0").unwrap(), Outcome::Unchanged);
        let seg = s.get("seg-0").unwrap();
        assert!(!seg.applied);
        assert_eq!(seg.original_current, "原句。");
    }

    #[test]
    fn insertion_segment_apply_leaves_text_unchanged() {
        let mut s = store("一。", "一。二。");
        assert!(s.get("seg-1").unwrap().is_insertion());
        assert_eq!(s.apply("一。", "seg-1").unwrap(), Outcome::Unchanged);
        assert!(!s.get("seg-1").unwrap().applied);
        assert_eq!(s.undo("一。", "seg-1"), Err(SegmentError::NotApplied("seg-1".into())));
    }

    #[test]
    fn apply_all_skips_insertions() {
        let mut s = store("一。", "一！二。");
        let (text, applied) = s.apply_all("一。");
        assert_eq!(text, "一！");
        assert_eq!(applied, 1);
        assert!(!s.get("seg-1").unwrap().applied);
    }

    #[test]
    fn undo_uses_offset_of_apply_when_revision_repeats_earlier() {
        let mut s = store("甲。乙。", "甲。甲。");
        assert_eq!(s.get("seg-1").unwrap().revised, "甲。");
        let text = s.apply("甲。乙。", "seg-1").unwrap().into_text("甲。乙。");
        assert_eq!(text, "甲。甲。");
        assert_eq!(s.get("seg-1").unwrap().applied_at, Some("甲。".len()));

        let text = s.undo(&text, "seg-1").unwrap().into_text(&text);
        assert_eq!(text, "甲。乙。");
    }

    #[test]
    fn undo_falls_back_to_first_occurrence_after_edit_moves_revision() {
        let mut s = store("一。", "二。");
        let text = s.apply("一。", "seg-0").unwrap().into_text("一。");
        let edited = format!("前言。{text}");
        let text = s.undo(&edited, "seg-0").unwrap().into_text(&edited);
        assert_eq!(text, "前言。一。");
    }

    #[test]
    fn apply_all_counts_applied_segments() {
        let original = "食堂饭菜太贵。宿舍很好。图书馆太小。";
        let mut s = store(original, "食堂饭菜价格偏高。宿舍很好。图书馆空间太小。");
        let (text, applied) = s.apply_all(original);
        assert_eq!(text, "食堂饭菜价格偏高。宿舍很好。图书馆空间太小。");
        assert_eq!(applied, 2);
        assert_eq!(s.applied_count(), 2);
        assert_eq!(s.change_count(), 2);
    }
}
