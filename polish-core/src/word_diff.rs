//! Word-level diff between two aligned sentences.
//!
//! Both sentences are tokenized into whitespace runs and word tokens, with
//! every CJK ideograph, kana and full-width punctuation mark as a token of its
//! own. Tokens always concatenate back to the input, which is what keeps the
//! reconstruction property of [`DiffChange`] runs intact.

use std::sync::LazyLock;

use regex::Regex;
use similar::{Algorithm, DiffTag};

use crate::types::{ChangeKind, DiffChange, DiffOptions, DiffStrategy};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\s+|[\p{Han}\p{Hiragana}\p{Katakana}\x{3000}-\x{303F}\x{FF00}-\x{FFEF}]|[^\s\p{Han}\p{Hiragana}\p{Katakana}\x{3000}-\x{303F}\x{FF00}-\x{FFEF}]+",
    )
    .expect("token pattern is valid")
});

/// Splits `text` into diff tokens. The alternatives cover every character, so
/// the matches tile the input without gaps.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Computes the diff between `original` and `modified` with `options`.
///
/// The result never has two consecutive runs of the same kind. Identical inputs
/// produce a single `Same` run (or nothing, for empty input).
pub fn diff_words(original: &str, modified: &str, options: DiffOptions) -> Vec<DiffChange> {
    let old = tokenize(original);
    let new = tokenize(modified);

    let changes = match options.strategy {
        DiffStrategy::Lookahead => lookahead_diff(&old, &new, options.lookahead),
        DiffStrategy::Myers => myers_diff(&old, &new),
    };
    merge_adjacent(changes)
}

enum Resync {
    /// `k` tokens were inserted at the modified cursor.
    Inserted(usize),
    /// `k` tokens were deleted at the original cursor.
    Deleted(usize),
}

/// Greedy cursor walk: on a mismatch, scan up to `window` tokens ahead on both
/// sides for the nearest point where the sequences line up again.
fn lookahead_diff(old: &[&str], new: &[&str], window: usize) -> Vec<DiffChange> {
    let mut changes = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0, 0);

    while i < old.len() || j < new.len() {
        if i < old.len() && j < new.len() {
            if old[i] == new[j] {
                changes.push(DiffChange::same(old[i]));
                i += 1;
                j += 1;
                continue;
            }
            match find_resync(old, new, i, j, window) {
                Some(Resync::Inserted(k)) => {
                    changes.push(DiffChange::added(new[j..j + k].concat()));
                    j += k;
                    continue;
                }
                Some(Resync::Deleted(k)) => {
                    changes.push(DiffChange::removed(old[i..i + k].concat()));
                    i += k;
                    continue;
                }
                None => {}
            }
        }

        if j < new.len() {
            changes.push(DiffChange::added(new[j]));
            j += 1;
        } else {
            changes.push(DiffChange::removed(old[i]));
            i += 1;
        }
    }

    changes
}

fn find_resync(old: &[&str], new: &[&str], i: usize, j: usize, window: usize) -> Option<Resync> {
    // Past both ends nothing can match.
    let window = window.min((old.len() - i).max(new.len() - j));
    for k in 1..=window {
        if new.get(j + k) == Some(&old[i]) {
            return Some(Resync::Inserted(k));
        }
        if old.get(i + k) == Some(&new[j]) {
            return Some(Resync::Deleted(k));
        }
    }
    None
}

fn myers_diff(old: &[&str], new: &[&str]) -> Vec<DiffChange> {
    let mut changes = Vec::new();
    for op in similar::capture_diff_slices(Algorithm::Myers, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => changes.push(DiffChange::same(old[old_range].concat())),
            DiffTag::Delete => changes.push(DiffChange::removed(old[old_range].concat())),
            DiffTag::Insert => changes.push(DiffChange::added(new[new_range].concat())),
            DiffTag::Replace => {
                changes.push(DiffChange::removed(old[old_range].concat()));
                changes.push(DiffChange::added(new[new_range].concat()));
            }
        }
    }
    changes
}

/// Concatenates neighbouring runs that share a kind and drops empty runs.
pub fn merge_adjacent(changes: Vec<DiffChange>) -> Vec<DiffChange> {
    let mut merged: Vec<DiffChange> = Vec::with_capacity(changes.len());
    for change in changes.into_iter().filter(|c| !c.text.is_empty()) {
        match merged.last_mut() {
            Some(last) if last.kind == change.kind => last.text.push_str(&change.text),
            _ => merged.push(change),
        }
    }
    merged
}

/// Rebuilds the original (`Same` + `Removed`) side of a diff.
pub fn original_side(diff: &[DiffChange]) -> String {
    side(diff, ChangeKind::Removed)
}

/// Rebuilds the revised (`Same` + `Added`) side of a diff.
pub fn revised_side(diff: &[DiffChange]) -> String {
    side(diff, ChangeKind::Added)
}

fn side(diff: &[DiffChange], keep: ChangeKind) -> String {
    diff.iter()
        .filter(|c| c.kind == ChangeKind::Same || c.kind == keep)
        .map(|c| c.text.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &[(&str, &str)] = &[
        ("", ""),
        ("", "全新的一句。"),
        ("被删除的一句。", ""),
        ("学校食堂饭菜太贵。", "学校食堂饭菜价格偏高。"),
        ("建议降价。", "建议适当降价以惠及学生。"),
        ("The food is expensive.", "The food is very expensive."),
        ("a b c d e f g h", "h g f e d c b a"),
        ("one  two\tthree\n", "one two three"),
        ("x x x x x x x", "y x y x y"),
        ("混合 mixed 文本。", "mixed 混合文本！"),
    ];

    fn strategies() -> [DiffOptions; 2] {
        [
            DiffOptions::default(),
            DiffOptions { strategy: DiffStrategy::Myers, ..DiffOptions::default() },
        ]
    }

    #[test]
    fn tokens_tile_the_input() {
        for (a, b) in PAIRS {
            assert_eq!(tokenize(a).concat(), *a);
            assert_eq!(tokenize(b).concat(), *b);
        }
    }

    #[test]
    fn tokenizer_splits_cjk_per_character() {
        assert_eq!(tokenize("饭菜 tasty!"), vec!["饭", "菜", " ", "tasty!"]);
        assert_eq!(tokenize("好。"), vec!["好", "。"]);
    }

    #[test]
    fn both_sides_reconstruct() {
        for options in strategies() {
            for (a, b) in PAIRS {
                let diff = diff_words(a, b, options);
                assert_eq!(original_side(&diff), *a, "original side for {a:?} -> {b:?}");
                assert_eq!(revised_side(&diff), *b, "revised side for {a:?} -> {b:?}");
            }
        }
    }

    #[test]
    fn no_two_neighbours_share_a_kind() {
        for options in strategies() {
            for (a, b) in PAIRS {
                let diff = diff_words(a, b, options);
                assert!(diff.windows(2).all(|w| w[0].kind != w[1].kind), "{diff:?}");
            }
        }
    }

    #[test]
    fn identical_input_is_one_same_run() {
        for options in strategies() {
            let diff = diff_words("无问题。 No issue here.", "无问题。 No issue here.", options);
            assert_eq!(diff, vec![DiffChange::same("无问题。 No issue here.")]);
            assert!(diff_words("", "", options).is_empty());
        }
    }

    #[test]
    fn lookahead_finds_replaced_phrase() {
        let diff = diff_words("学校食堂饭菜太贵。", "学校食堂饭菜价格偏高。", DiffOptions::default());
        assert_eq!(
            diff,
            vec![
                DiffChange::same("学校食堂饭菜"),
                DiffChange::added("价格偏高"),
                DiffChange::removed("太贵"),
                DiffChange::same("。"),
            ]
        );
    }

    #[test]
    fn lookahead_resyncs_after_insertion() {
        let diff = diff_words("The food is expensive.", "The food is very expensive.", DiffOptions::default());
        assert_eq!(
            diff,
            vec![
                DiffChange::same("The food is "),
                DiffChange::added("very "),
                DiffChange::same("expensive."),
            ]
        );
    }

    #[test]
    fn lookahead_resyncs_after_deletion() {
        let diff = diff_words("建议适当降价。", "建议降价。", DiffOptions::default());
        assert_eq!(
            diff,
            vec![
                DiffChange::same("建议"),
                DiffChange::removed("适当"),
                DiffChange::same("降价。"),
            ]
        );
    }

    #[test]
    fn zero_window_degrades_to_single_token_changes() {
        let options = DiffOptions { lookahead: 0, ..DiffOptions::default() };
        let diff = diff_words("a b", "a c b", options);
        assert_eq!(original_side(&diff), "a b");
        assert_eq!(revised_side(&diff), "a c b");
    }

    #[test]
    fn unbounded_window_matches_default_window() {
        let wide = DiffOptions { lookahead: usize::MAX, ..DiffOptions::default() };
        let old = "学校食堂饭菜太贵。";
        let new = "学校食堂饭菜价格偏高。";
        assert_eq!(diff_words(old, new, wide), diff_words(old, new, DiffOptions::default()));
        assert_eq!(diff_words("a b", "a c b", wide), diff_words("a b", "a c b", DiffOptions::default()));
    }

    #[test]
    fn myers_reports_minimal_edit() {
        let options = DiffOptions { strategy: DiffStrategy::Myers, ..DiffOptions::default() };
        let diff = diff_words("学校食堂饭菜太贵。", "学校食堂饭菜价格偏高。", options);
        assert_eq!(
            diff,
            vec![
                DiffChange::same("学校食堂饭菜"),
                DiffChange::removed("太贵"),
                DiffChange::added("价格偏高"),
                DiffChange::same("。"),
            ]
        );
    }
}
