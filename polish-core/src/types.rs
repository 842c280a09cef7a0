use std::fmt;

/// Tag for one run of a word-level diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Text present in both the original and the revised sentence.
    Same,
    /// Text only present in the revised sentence.
    Added,
    /// Text only present in the original sentence.
    Removed,
}

/// One tagged run of text inside a sentence diff.
///
/// Concatenating the `Same` and `Removed` runs of a diff in order yields the
/// original sentence; concatenating `Same` and `Added` yields the revised one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffChange {
    pub kind: ChangeKind,
    pub text: String,
}

impl DiffChange {
    pub fn new(kind: ChangeKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn same(text: impl Into<String>) -> Self {
        Self::new(ChangeKind::Same, text)
    }

    pub fn added(text: impl Into<String>) -> Self {
        Self::new(ChangeKind::Added, text)
    }

    pub fn removed(text: impl Into<String>) -> Self {
        Self::new(ChangeKind::Removed, text)
    }
}

/// One aligned (original sentence, revised sentence) pair and its apply state.
///
/// `original_current` tracks what the sentence currently reads as in the live
/// field: it becomes `revised` after an apply and returns to
/// `original_before_apply` after an undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: String,                    // "seg-<ordinal>"
    pub original_current: String,
    pub original_before_apply: String,
    pub revised: String,
    pub diff: Vec<DiffChange>,
    pub has_changes: bool,
    pub applied: bool,
    /// Byte offset in the live field where the last apply substituted.
    pub applied_at: Option<usize>,
}

impl Segment {
    /// True for segments synthesized from trailing revised sentences that have
    /// no original counterpart.
    pub fn is_insertion(&self) -> bool {
        self.original_before_apply.is_empty()
    }
}

/// The three polishable text fields of a proposal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldType {
    /// 案由: the short statement of the proposal.
    #[default]
    Brief,
    /// 情况分析: the situation analysis.
    Analysis,
    /// 具体建议: the concrete suggestions.
    Suggest,
}

impl FieldType {
    /// All fields in form order.
    pub const ALL: [FieldType; 3] = [FieldType::Brief, FieldType::Analysis, FieldType::Suggest];

    /// Wire/storage name, matching the `fieldType` value the polish endpoint expects.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Brief => "brief",
            FieldType::Analysis => "analysis",
            FieldType::Suggest => "suggest",
        }
    }

    /// Human-facing label used in prompts and alerts.
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Brief => "案由",
            FieldType::Analysis => "情况分析",
            FieldType::Suggest => "具体建议",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "brief" => Some(FieldType::Brief),
            "analysis" => Some(FieldType::Analysis),
            "suggest" => Some(FieldType::Suggest),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            FieldType::Brief => FieldType::Analysis,
            FieldType::Analysis => FieldType::Suggest,
            FieldType::Suggest => FieldType::Brief,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FieldType::Brief => FieldType::Suggest,
            FieldType::Analysis => FieldType::Brief,
            FieldType::Suggest => FieldType::Analysis,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A locally stored proposal draft.
///
/// Drafts are keyed by UUID v4 text and hold the three polishable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub id: String,           // UUID v4 text
    pub title: String,
    pub brief: String,
    pub analysis: String,
    pub suggest: String,
    pub created_at: i64,      // Unix timestamp seconds
    pub updated_at: i64,      // Unix timestamp seconds
}

impl Draft {
    pub fn field(&self, field: FieldType) -> &str {
        match field {
            FieldType::Brief => &self.brief,
            FieldType::Analysis => &self.analysis,
            FieldType::Suggest => &self.suggest,
        }
    }

    pub fn field_mut(&mut self, field: FieldType) -> &mut String {
        match field {
            FieldType::Brief => &mut self.brief,
            FieldType::Analysis => &mut self.analysis,
            FieldType::Suggest => &mut self.suggest,
        }
    }
}

/// One closed review, as recorded in `polish_history`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolishRecord {
    pub id: String,
    pub draft_id: String,
    pub field_type: FieldType,
    pub original_text: String,
    pub revised_text: String,
    pub segment_count: i64,
    pub applied_count: i64,
    pub created_at: i64,
}

/// Which word-diff algorithm [`crate::word_diff`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStrategy {
    /// Greedy cursor walk with a bounded lookahead window.
    #[default]
    Lookahead,
    /// Myers shortest edit script over the same tokens.
    Myers,
}

/// Word-diff settings shared by every segment of one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    pub strategy: DiffStrategy,
    /// Maximum number of tokens the lookahead strategy scans ahead.
    pub lookahead: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self { strategy: DiffStrategy::Lookahead, lookahead: 5 }
    }
}
