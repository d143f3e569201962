//! Text similarity used to match track metadata against catalog results.
//!
//! The scores are heuristics tuned for song titles, artist credits and album
//! names. They are not a general fuzzy-matching toolkit.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Separators between artist names in a credit line
/// (comma, backslash, ampersand, space, plus, pipe, CJK comma, fullwidth comma, slash).
static ARTIST_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\\& +|、，/]+").expect("artist separator regex"));

/// Similarity of `b` to the query text `a`, in `[0, 1]`.
///
/// An empty query yields `0.5` so optional fields (album) neither help nor
/// disqualify a candidate. An empty candidate against a non-empty query
/// yields `0.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() {
        return 0.5;
    }
    if b.is_empty() {
        return 0.0;
    }

    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let common_ratio = longest_common_substring(&a, &b) as f64 / a.len() as f64;
    let duplicate_rate = duplicate_rate(&a, &b);
    common_ratio * duplicate_rate.sqrt().powf(1.0 / 1.5)
}

/// Compare two artist credit lines.
///
/// Every query artist is matched against its best counterpart on the
/// candidate side and the best scores are averaged over the query side, so
/// the result is asymmetric.
pub fn artist_similarity(query: &str, candidate: &str) -> f64 {
    if query.is_empty() {
        return 0.5;
    }

    let wanted = split_artists(query);
    let offered = split_artists(candidate);
    if wanted.is_empty() || offered.is_empty() {
        return 0.0;
    }

    let total: f64 = wanted
        .iter()
        .map(|w| {
            offered
                .iter()
                .map(|o| similarity(w, o))
                .fold(0.0, f64::max)
        })
        .sum();
    total / wanted.len() as f64
}

fn split_artists(text: &str) -> Vec<&str> {
    ARTIST_SPLIT
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Jaccard index of the distinct characters of both strings.
fn duplicate_rate(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<char> = a.iter().copied().collect();
    let set_b: HashSet<char> = b.iter().copied().collect();
    let common = set_a.intersection(&set_b).count();
    let total = set_a.union(&set_b).count();
    common as f64 / total as f64
}

/// Length of the longest contiguous run shared by `a` and `b`.
///
/// Two rolling rows sized by the shorter input keep memory at
/// O(min(len(a), len(b))).
fn longest_common_substring(a: &[char], b: &[char]) -> usize {
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if inner.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; inner.len() + 1];
    let mut current = vec![0usize; inner.len() + 1];
    let mut best = 0;

    for &co in outer {
        for (j, &ci) in inner.iter().enumerate() {
            current[j + 1] = if co == ci { previous[j] + 1 } else { 0 };
            best = best.max(current[j + 1]);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("", "abc"), 0.5);
        assert_eq!(similarity("", ""), 0.5);
    }

    #[test]
    fn test_identical_and_case_insensitive() {
        assert_eq!(similarity("Shape of You", "Shape of You"), 1.0);
        assert_eq!(similarity("ABC", "abc"), 1.0);
        assert_eq!(similarity("夜に駆ける", "夜に駆ける"), 1.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_partial_match() {
        // lcs("hello", "hello world") = 5, char sets {h,e,l,o} vs {h,e,l,o,w,r,d,' '}
        let expected = 1.0 * (4.0f64 / 8.0).powf(1.0 / 3.0);
        assert!((similarity("hello", "Hello World") - expected).abs() < 1e-9);

        // Asymmetric: the ratio is relative to the query length.
        assert!(similarity("hello world", "hello") < similarity("hello", "hello world"));
    }

    #[test]
    fn test_longest_common_substring() {
        assert_eq!(longest_common_substring(&chars("abcdef"), &chars("zcdez")), 3);
        assert_eq!(longest_common_substring(&chars("abc"), &chars("")), 0);
        // Contiguous, not subsequence.
        assert_eq!(longest_common_substring(&chars("axbxc"), &chars("abc")), 1);
    }

    #[test]
    fn test_duplicate_rate() {
        assert_eq!(duplicate_rate(&[], &[]), 1.0);
        assert_eq!(duplicate_rate(&chars("a"), &[]), 0.0);
        assert_eq!(duplicate_rate(&chars("aab"), &chars("bc")), 1.0 / 3.0);
    }

    #[test]
    fn test_artist_similarity() {
        assert_eq!(artist_similarity("", "anyone"), 0.5);
        assert_eq!(artist_similarity("Someone", ""), 0.0);
        assert_eq!(artist_similarity(" / ", "Someone"), 0.0);

        assert_eq!(artist_similarity("YOASOBI", "YOASOBI"), 1.0);
        assert_eq!(artist_similarity("A&B", "B / A"), 1.0);
        assert_eq!(artist_similarity("周杰伦、费玉清", "费玉清，周杰伦"), 1.0);

        // One of two query artists missing entirely halves the score.
        assert_eq!(artist_similarity("abc+xyz", "abc"), 0.5);
    }
}
