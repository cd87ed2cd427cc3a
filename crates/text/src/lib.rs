//! Text normalization and keyword matching primitives.
//!
//! Provides the pure string functions the scorer is built on:
//! - `normalize`: canonical form for all matching
//! - `find_keyword`: word-boundary-safe leftmost phrase search
//! - `ordered_match`: in-order, non-contiguous multi-word search
//!
//! All offsets returned by this crate are byte offsets into the
//! *normalized* form of the text.

/// Normalize raw product text for matching.
///
/// Lower-cases, turns hyphens and forward slashes into single spaces
/// (so "mini-pendant" and "mini pendant" compare equal, and "1-Light"
/// stays two tokens), collapses whitespace runs, and trims. Idempotent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == '/' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Whether `range` within `text` sits on word boundaries at both ends.
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

/// Find the leftmost word-boundary-safe occurrence of `phrase` in `text`.
///
/// Both sides are normalized before matching, so catalog phrases may carry
/// hyphens or mixed case. A bare word never matches inside a longer word:
/// "brush" does not match "brushed". Returns the byte offset of the match
/// in the normalized text, or `None`.
pub fn find_keyword(text: &str, phrase: &str) -> Option<usize> {
    let haystack = normalize(text);
    let needle = normalize(phrase);
    if needle.is_empty() || haystack.is_empty() {
        return None;
    }

    // A boundary-rejected occurrence may overlap a later valid one, so on
    // rejection resume one character past the rejected start rather than
    // past the whole match.
    let mut from = 0;
    while let Some(found) = haystack[from..].find(&needle) {
        let start = from + found;
        if on_word_boundary(&haystack, start, start + needle.len()) {
            return Some(start);
        }
        from = start
            + haystack[start..]
                .chars()
                .next()
                .map_or(1, |c| c.len_utf8());
    }
    None
}

/// Whether `phrase` occurs in `text` on word boundaries.
pub fn contains_keyword(text: &str, phrase: &str) -> bool {
    find_keyword(text, phrase).is_some()
}

/// Split normalized text into words with their byte offsets.
pub fn words_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c == ' ' {
            if let Some(s) = start.take() {
                out.push((s, &text[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }
    out
}

/// Find a non-contiguous, in-order occurrence of `phrase`'s words in `text`.
///
/// Each phrase word must match a whole word of the text, in the same
/// relative order but with other words allowed in between ("drill bit"
/// matches "drill masonry bit"). Returns the offset of the first matched
/// word in the normalized text.
pub fn ordered_match(text: &str, phrase: &str) -> Option<usize> {
    let haystack = normalize(text);
    let needle = normalize(phrase);
    let wanted: Vec<&str> = needle.split_whitespace().collect();
    if wanted.is_empty() {
        return None;
    }

    let mut next = 0;
    let mut first_offset = None;
    for (offset, word) in words_with_offsets(&haystack) {
        if word == wanted[next] {
            if next == 0 {
                first_offset = Some(offset);
            }
            next += 1;
            if next == wanted.len() {
                return first_offset;
            }
        }
    }
    None
}

/// Number of words in a phrase after normalization.
pub fn word_count(phrase: &str) -> usize {
    normalize(phrase).split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  GE PowerMark  Plus "), "ge powermark plus");
        assert_eq!(normalize("Mini-Pendant"), "mini pendant");
        assert_eq!(normalize("Indoor/Outdoor Rug"), "indoor outdoor rug");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for s in ["Mini-Pendant 1-Light", "  a  b ", "AC/DC Adapter", "", "brushed-NICKEL/chrome"] {
            assert_eq!(normalize(&normalize(s)), normalize(s));
        }
    }

    #[test]
    fn test_hyphen_equivalence() {
        assert_eq!(normalize("mini-pendant"), normalize("mini pendant"));
        // "1-Light" must not fuse into one token
        assert_eq!(normalize("1-Light"), "1 light");
    }

    #[test]
    fn test_word_boundary_safety() {
        assert_eq!(find_keyword("brushed nickel faucet", "brush"), None);
        assert_eq!(find_keyword("paint brush set", "brush"), Some(6));
        assert_eq!(find_keyword("drill bits", "bit"), None);
    }

    #[test]
    fn test_find_keyword_leftmost() {
        assert_eq!(find_keyword("led bulb and led strip", "led"), Some(0));
        // skips the embedded hit, takes the later whole-word one
        assert_eq!(find_keyword("sledgehammer and sled", "sled"), Some(17));
    }

    #[test]
    fn test_rejected_occurrence_does_not_hide_overlapping_match() {
        // the embedded hit at offset 1 overlaps the valid one at offset 5;
        // the scan must not skip past it
        assert_eq!(find_keyword("sled led led", "led led"), Some(5));
        assert_eq!(find_keyword("sled led strip", "led"), Some(5));
    }

    #[test]
    fn test_find_keyword_normalizes_both_sides() {
        assert_eq!(find_keyword("Mini-Pendant Light", "mini pendant"), Some(0));
        assert_eq!(find_keyword("mini pendant light", "Mini-Pendant"), Some(0));
    }

    #[test]
    fn test_multiword_phrase_boundaries() {
        assert_eq!(find_keyword("circuit breaker panel", "circuit breaker"), Some(0));
        assert_eq!(find_keyword("circuit breakers", "circuit breaker"), None);
    }

    #[test]
    fn test_ordered_match() {
        assert_eq!(ordered_match("drill masonry bit set", "drill bit"), Some(0));
        assert_eq!(ordered_match("bit for a drill", "drill bit"), None);
        assert_eq!(ordered_match("drill bit", "drill bit"), Some(0));
        assert_eq!(ordered_match("cordless drill driver kit", "drill kit"), Some(9));
    }

    #[test]
    fn test_ordered_match_whole_words_only() {
        assert_eq!(ordered_match("drills and bits", "drill bit"), None);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("circuit breaker"), 2);
        assert_eq!(word_count("mini-pendant"), 2);
        assert_eq!(word_count("rug"), 1);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_words_with_offsets() {
        assert_eq!(
            words_with_offsets("door lock set"),
            vec![(0, "door"), (5, "lock"), (10, "set")]
        );
    }
}
