//! Sentence segmentation on terminal punctuation.
//!
//! A sentence ends at a run of `。！？.!?` plus any whitespace that follows it;
//! the delimiter stays attached to the sentence it closes. Text after the last
//! delimiter forms a final sentence of its own.

use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[。！？.!?]+\s*").expect("sentence delimiter pattern is valid")
});

/// Splits `text` into sentences, keeping delimiters and trailing whitespace.
///
/// Whitespace-only fragments are dropped, so concatenating the result gives
/// back `text` minus those fragments. Empty input yields an empty list; text
/// without terminal punctuation comes back as a single sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        push_non_blank(&mut sentences, &text[start..m.end()]);
        start = m.end();
    }
    push_non_blank(&mut sentences, &text[start..]);

    sentences
}

fn push_non_blank<'a>(out: &mut Vec<&'a str>, fragment: &'a str) {
    if !fragment.trim().is_empty() {
        out.push(fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_chinese_sentences() {
        let sentences = split_sentences("学校食堂饭菜太贵。建议降价。");
        assert_eq!(sentences, vec!["学校食堂饭菜太贵。", "建议降价。"]);
    }

    #[test]
    fn keeps_trailing_whitespace_with_sentence() {
        let sentences = split_sentences("Hello world. This is a test!  Final?");
        assert_eq!(sentences, vec!["Hello world. ", "This is a test!  ", "Final?"]);
    }

    #[test]
    fn punctuation_runs_stay_together() {
        let sentences = split_sentences("真的吗？！好的。。。");
        assert_eq!(sentences, vec!["真的吗？！", "好的。。。"]);
    }

    #[test]
    fn no_punctuation_is_one_sentence() {
        assert_eq!(split_sentences("没有标点的一段话"), vec!["没有标点的一段话"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\t").is_empty());
    }

    #[test]
    fn concatenation_reproduces_input() {
        let text = "第一句。\n第二句！第三句没有结尾";
        assert_eq!(split_sentences(text).concat(), text);
    }

    #[test]
    fn every_sentence_is_non_blank() {
        for text in ["。。。", "a. b. c.", "  x!  ", "\n\n结尾。\n"] {
            let sentences = split_sentences(text);
            assert!(!sentences.is_empty(), "non-empty text {text:?} must yield sentences");
            assert!(sentences.iter().all(|s| !s.trim().is_empty()));
        }
    }
}
