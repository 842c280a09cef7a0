//! Core of the proposal polish reviewer.
//!
//! Turns an AI-polished rewrite of a proposal field into a list of sentence
//! segments that can be applied to, or undone from, the live field text one at
//! a time:
//!
//! 1. [`segmenter`] splits both texts into sentences.
//! 2. [`align`] pairs each original sentence with its closest revision.
//! 3. [`word_diff`] computes the word-level diff of every pair.
//! 4. [`segments`] holds the resulting [`Segment`]s and performs apply/undo.
//!
//! Drafts of the proposal form are persisted by [`db`].

pub mod align;
pub mod db;
pub mod error;
pub mod schema;
pub mod segmenter;
pub mod segments;
pub mod types;
pub mod validate;
pub mod word_diff;

pub use error::{PolishError, SegmentError};
pub use segments::{create_segments, Outcome, PolishResult, SegmentStore};
pub use types::{ChangeKind, DiffChange, DiffOptions, DiffStrategy, Draft, FieldType, Segment};
