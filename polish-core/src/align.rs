//! Pairs original sentences with their closest revised sentence.

/// One alignment result: an original sentence (empty for trailing insertions)
/// and the revised sentence it is diffed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentencePair<'a> {
    pub original: &'a str,
    pub revised: &'a str,
}

/// Matches every original sentence to the revised sentence with the smallest
/// character edit distance.
///
/// Matching is independent per original sentence, so one revised sentence can
/// be chosen by several originals. Ties go to the lowest revised index. With
/// no revised sentences at all, each original pairs with itself.
///
/// Revised sentences beyond `original.len()` are appended as pairs with an
/// empty original.
pub fn align_sentences<'a>(original: &[&'a str], revised: &[&'a str]) -> Vec<SentencePair<'a>> {
    let mut pairs: Vec<SentencePair<'a>> = original
        .iter()
        .map(|&orig| SentencePair { original: orig, revised: best_match(orig, revised).unwrap_or(orig) })
        .collect();

    pairs.extend(
        revised
            .iter()
            .skip(original.len())
            .map(|&rev| SentencePair { original: "", revised: rev }),
    );

    pairs
}

fn best_match<'a>(sentence: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let mut best: Option<(usize, &'a str)> = None;
    for &candidate in candidates {
        let distance = levenshtein(sentence, candidate);
        // Strict comparison keeps the first minimum.
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}

/// Character-level Levenshtein distance with unit insert/delete/substitute cost.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        matrix[0][j] = j;
    }

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            matrix[i + 1][j + 1] = (matrix[i][j + 1] + 1)
                .min(matrix[i + 1][j] + 1)
                .min(matrix[i][j] + cost);
        }
    }

    matrix[a.len()][b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_counts_characters_not_bytes() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("太贵", "价格偏高"), 4);
        assert_eq!(levenshtein("建议降价。", "建议适当降价。"), 2);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn pairs_each_original_with_closest_revision() {
        let original = ["学校食堂饭菜太贵。", "建议降价。"];
        let revised = ["学校食堂饭菜价格偏高。", "建议适当降价以惠及学生。"];
        let pairs = align_sentences(&original, &revised);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].revised, "学校食堂饭菜价格偏高。");
        assert_eq!(pairs[1].revised, "建议适当降价以惠及学生。");
    }

    #[test]
    fn ties_pick_lowest_index() {
        let pairs = align_sentences(&["ab"], &["ax", "ay"]);
        assert_eq!(pairs[0].revised, "ax");
    }

    #[test]
    fn revised_sentence_can_be_reused() {
        let pairs = align_sentences(&["同一句。", "同一句！"], &["同一句。"]);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.revised == "同一句。"));
    }

    #[test]
    fn empty_revision_keeps_original() {
        let pairs = align_sentences(&["保持不变。"], &[]);
        assert_eq!(pairs, vec![SentencePair { original: "保持不变。", revised: "保持不变。" }]);
    }

    #[test]
    fn trailing_revised_sentences_become_insertions() {
        let pairs = align_sentences(&["一。", "二。"], &["一。", "二。", "三。"]);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2], SentencePair { original: "", revised: "三。" });
    }
}
