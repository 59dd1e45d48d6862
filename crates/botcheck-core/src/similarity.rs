use std::collections::HashSet;

/// Character-trigram Jaccard similarity with length normalization (§4.4
/// duplicate-text detection, §6.4 `similarity_metric = trigram-jaccard`).
///
/// Returns a value in `[0, 1]`; two empty/too-short strings (fewer than 3
/// chars) compare as `0.0` rather than `1.0`, since there is no shingle
/// evidence of similarity.
pub fn trigram_jaccard(a: &str, b: &str) -> f64 {
    let shingles_a = trigrams(a);
    let shingles_b = trigrams(b);

    if shingles_a.is_empty() || shingles_b.is_empty() {
        return 0.0;
    }

    let intersection = shingles_a.intersection(&shingles_b).count();
    let union = shingles_a.union(&shingles_b).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn trigrams(s: &str) -> HashSet<[char; 3]> {
    let normalized: Vec<char> = s.trim().to_lowercase().chars().collect();
    if normalized.len() < 3 {
        return HashSet::new();
    }
    normalized
        .windows(3)
        .map(|w| [w[0], w[1], w[2]])
        .collect()
}

/// Highest pairwise similarity of `text` against any of `others`.
pub fn max_pairwise_similarity(text: &str, others: &[String]) -> f64 {
    others
        .iter()
        .map(|other| trigram_jaccard(text, other))
        .fold(0.0_f64, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_are_fully_similar() {
        assert_eq!(trigram_jaccard("the quick brown fox", "the quick brown fox"), 1.0);
    }

    #[test]
    fn unrelated_strings_are_dissimilar() {
        assert!(trigram_jaccard("completely different text here", "nothing alike whatsoever at all") < 0.2);
    }

    #[test]
    fn short_strings_have_no_shingle_evidence() {
        assert_eq!(trigram_jaccard("hi", "ho"), 0.0);
        assert_eq!(trigram_jaccard("", "anything"), 0.0);
    }

    #[test]
    fn max_pairwise_picks_the_closest_match() {
        let others = vec!["totally unrelated sentence".to_string(), "the quick brown fox jumps".to_string()];
        let sim = max_pairwise_similarity("the quick brown fox jumps", &others);
        assert_eq!(sim, 1.0);
    }

    #[test]
    fn case_and_whitespace_are_normalized() {
        assert_eq!(trigram_jaccard("  Hello World  ", "hello world"), 1.0);
    }
}
