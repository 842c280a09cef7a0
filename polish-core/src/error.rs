//! Error types for the review engine and the polish call.
//!
//! A substring that cannot be found during apply/undo is deliberately *not* an
//! error: it is reported through [`crate::segments::Outcome::Unchanged`].

use thiserror::Error;

use crate::types::FieldType;

/// Rejected apply/undo requests. The segment list and text are left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentError {
    #[error("segment not found: {0}")]
    NotFound(String),

    #[error("segment {0} is already applied")]
    AlreadyApplied(String),

    #[error("segment {0} is not applied")]
    NotApplied(String),
}

/// Failures surfaced to the user as an alert when polishing a field.
#[derive(Debug, Error)]
pub enum PolishError {
    #[error("请先输入{}内容", .0.label())]
    EmptyInput(FieldType),

    #[error("{}内容太少，无需润色", .0.label())]
    TooShort(FieldType),

    #[error("AI 润色请求失败: {0}")]
    Transport(String),

    #[error("{0}")]
    Rejected(String),

    #[error("AI 润色返回了无法解析的结果: {0}")]
    InvalidResponse(String),
}
