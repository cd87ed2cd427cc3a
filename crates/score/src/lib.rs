//! Per-type scoring and negative-keyword disambiguation.
//!
//! Takes one product and one pattern and produces a `ScoreBreakdown`:
//! a negative-keyword gate, a mutually-exclusive title tier, then capped
//! accumulation over the weaker signal categories, with a reason string
//! appended for every award.

use std::collections::HashSet;

use prodtype_model::{MatchTier, Pattern, Product, ScoreBreakdown, TitleMatch};
use prodtype_text::{contains_keyword, find_keyword, normalize, ordered_match, word_count,
    words_with_offsets};

/// The named weight table for all scoring constants.
///
/// Recalibration is a data change: construct a modified table and pass it
/// through the pipeline instead of editing scorer code.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    /// Exact contiguous multi-word strong keyword in title
    pub title_exact: u32,
    /// Multi-word strong keyword matched in order, non-contiguous
    pub title_partial: u32,
    /// Single-word strong keyword in title
    pub title_single: u32,
    /// Any strong keyword found in the description
    pub description_strong: u32,
    /// Per distinct weak keyword, and the category cap
    pub weak_each: u32,
    pub weak_cap: u32,
    /// Per description hint, and the category cap
    pub hint_each: u32,
    pub hint_cap: u32,
    /// Per matching spec indicator, and the category cap
    pub spec_each: u32,
    pub spec_cap: u32,
    /// Per shared domain tag, and the category cap
    pub domain_each: u32,
    pub domain_cap: u32,
    /// Leftmost title match among all candidates for the product
    pub primary_bonus: u32,
    /// Matched title phrase has 3+ words
    pub specificity_bonus: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            title_exact: 95,
            title_partial: 70,
            title_single: 60,
            description_strong: 25,
            weak_each: 8,
            weak_cap: 24,
            hint_each: 6,
            hint_cap: 18,
            spec_each: 10,
            spec_cap: 20,
            domain_each: 5,
            domain_cap: 10,
            primary_bonus: 5,
            specificity_bonus: 5,
        }
    }
}

/// Head nouns that mark a product as a component or consumable. A negative
/// keyword directly modifying one of these describes what the product is
/// FOR, not what it IS.
const COMPONENT_HEAD_NOUNS: &[&str] = &[
    "bulb", "bulbs", "led", "lamp", "shade", "cover", "kit", "filter", "blade", "blades",
    "battery", "batteries", "charger", "adapter", "cord", "mount", "bracket", "remote",
];

/// Connectors that read as accompaniment ("comes with"), defeating the
/// modifier reading: "chandelier with led bulbs" is still a chandelier.
const CONNECTOR_WORDS: &[&str] = &["with", "and", "includes", "including", "plus", "w"];

/// Use-case preposition phrases, as word sequences.
const USE_CASE_PREPOSITIONS: &[&[&str]] = &[
    &["for"],
    &["fits"],
    &["compatible", "with"],
    &["replacement", "for"],
    &["works", "with"],
    &["designed", "for"],
];

/// Which cascade rule recovered a negative-keyword hit as a false block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FalseBlockRule {
    /// The negative keyword modifies a component head noun or one of the
    /// pattern's own strong keywords ("Chandelier LED Bulb")
    ComponentModifier,
    /// A use-case preposition precedes the keyword ("for chandeliers")
    UseCasePhrase,
    /// One of the pattern's strong keywords appears earlier in the text
    PrimaryProduct,
}

impl FalseBlockRule {
    fn label(self) -> &'static str {
        match self {
            Self::ComponentModifier => "modifies a component noun",
            Self::UseCasePhrase => "use-case phrase",
            Self::PrimaryProduct => "strong keyword is primary",
        }
    }
}

/// Decide whether a negative-keyword hit should be ignored.
///
/// Returns the first cascade rule that recovers the hit, or `None` when the
/// keyword stands as a true disqualifier. `text` must contain the keyword;
/// callers check presence first.
pub fn false_block_rule(
    text: &str,
    negative_keyword: &str,
    pattern: &Pattern,
) -> Option<FalseBlockRule> {
    let text = normalize(text);
    let negative = normalize(negative_keyword);
    let neg_pos = find_keyword(&text, &negative)?;

    let words = words_with_offsets(&text);
    // punctuation survives normalization, so the keyword may start mid-word
    let neg_word_index = words
        .iter()
        .position(|(offset, word)| *offset <= neg_pos && neg_pos < offset + word.len())?;

    // Rule 1: modifier/compound-head. Look at the few words right after the
    // keyword; a connector word ends the modifier reading before it starts.
    // the match target may start at most 3 intervening words later
    let following = &words[neg_word_index + word_count(&negative)..];
    for (offset, word) in following.iter().take(4) {
        if CONNECTOR_WORDS.contains(word) {
            break;
        }
        if COMPONENT_HEAD_NOUNS.contains(word) {
            return Some(FalseBlockRule::ComponentModifier);
        }
        let starts_strong = pattern
            .strong_keywords
            .iter()
            .any(|kw| find_keyword(&text[*offset..], kw) == Some(0));
        if starts_strong {
            return Some(FalseBlockRule::ComponentModifier);
        }
    }

    // Rule 2: use-case preposition within a short window before the keyword.
    for prep in USE_CASE_PREPOSITIONS {
        for start in 0..neg_word_index.saturating_sub(prep.len() - 1) {
            let candidate: Vec<&str> = words[start..start + prep.len()]
                .iter()
                .map(|(_, w)| *w)
                .collect();
            if candidate == *prep {
                let intervening = neg_word_index - (start + prep.len());
                if intervening <= 3 {
                    return Some(FalseBlockRule::UseCasePhrase);
                }
            }
        }
    }

    // Rule 3: one of the pattern's own strong keywords is the primary
    // product, mentioned before the negative keyword.
    let strong_earlier = pattern.strong_keywords.iter().any(|kw| {
        find_keyword(&text, kw).is_some_and(|pos| pos < neg_pos && pos + normalize(kw).len() <= neg_pos)
    });
    if strong_earlier {
        return Some(FalseBlockRule::PrimaryProduct);
    }

    None
}

/// Whether a negative-keyword hit should be ignored (not disqualify).
pub fn is_false_block(text: &str, negative_keyword: &str, pattern: &Pattern) -> bool {
    false_block_rule(text, negative_keyword, pattern).is_some()
}

/// Score one pattern against one product.
///
/// The negative gate runs first and short-circuits to a zeroed breakdown
/// when a keyword survives disambiguation. The primary-position bonus is
/// cross-candidate and applied later by `apply_primary_bonus`.
pub fn score_pattern(product: &Product, pattern: &Pattern, weights: &ScoreWeights) -> ScoreBreakdown {
    let title = normalize(&product.title);
    let description = normalize(&product.description);
    let combined = if description.is_empty() {
        title.clone()
    } else if title.is_empty() {
        description.clone()
    } else {
        format!("{title} {description}")
    };

    let mut breakdown = ScoreBreakdown::empty(&pattern.type_name);

    // Negative-keyword gate
    for negative in &pattern.negative_keywords {
        if find_keyword(&combined, negative).is_none() {
            continue;
        }
        match false_block_rule(&combined, negative, pattern) {
            Some(rule) => breakdown
                .reasons
                .push(format!("Ignored negative '{}' ({})", negative, rule.label())),
            None => return ScoreBreakdown::disqualified(&pattern.type_name, negative),
        }
    }

    // Title tier: best applicable match across strong keywords
    let mut best: Option<(TitleMatch, &str)> = None;
    for keyword in &pattern.strong_keywords {
        let words = word_count(keyword);
        let candidate = if words >= 2 {
            find_keyword(&title, keyword)
                .map(|position| TitleMatch { position, word_count: words, tier: MatchTier::ExactPhrase })
                .or_else(|| {
                    ordered_match(&title, keyword).map(|position| TitleMatch {
                        position,
                        word_count: words,
                        tier: MatchTier::OrderedPartial,
                    })
                })
        } else {
            find_keyword(&title, keyword)
                .map(|position| TitleMatch { position, word_count: 1, tier: MatchTier::SingleWord })
        };

        if let Some(m) = candidate {
            let better = match &best {
                None => true,
                Some((current, _)) => {
                    (m.tier, std::cmp::Reverse(m.position), m.word_count)
                        > (current.tier, std::cmp::Reverse(current.position), current.word_count)
                }
            };
            if better {
                best = Some((m, keyword.as_str()));
            }
        }
    }

    if let Some((m, keyword)) = best {
        let (points, label) = match m.tier {
            MatchTier::ExactPhrase => (weights.title_exact, "exact"),
            MatchTier::OrderedPartial => (weights.title_partial, "partial"),
            MatchTier::SingleWord => (weights.title_single, "single word"),
        };
        breakdown.title_points = points;
        breakdown.title_match = Some(m);
        breakdown
            .reasons
            .push(format!("Title {} match: '{}' (+{})", label, keyword, points));

        if m.word_count >= 3 {
            breakdown.bonus_points += weights.specificity_bonus;
            breakdown.reasons.push(format!(
                "Specificity bonus: {}-word phrase (+{})",
                m.word_count, weights.specificity_bonus
            ));
        }
    }

    // Description strong-keyword match, independent of the title tier
    if let Some(keyword) = pattern
        .strong_keywords
        .iter()
        .find(|kw| contains_keyword(&description, kw))
    {
        breakdown.description_points = weights.description_strong;
        breakdown.reasons.push(format!(
            "Description strong match: '{}' (+{})",
            keyword, weights.description_strong
        ));
    }

    // Weak-keyword accumulation, capped
    let mut seen = HashSet::new();
    let mut weak_raw = 0;
    for keyword in &pattern.weak_keywords {
        if !seen.insert(normalize(keyword)) {
            continue;
        }
        if contains_keyword(&combined, keyword) {
            weak_raw += weights.weak_each;
            breakdown
                .reasons
                .push(format!("Weak keyword: '{}' (+{})", keyword, weights.weak_each));
        }
    }
    breakdown.weak_points = weak_raw.min(weights.weak_cap);
    if weak_raw > weights.weak_cap {
        breakdown
            .reasons
            .push(format!("Weak keywords capped at {}", weights.weak_cap));
    }

    // Description hints, capped
    let mut hint_raw = 0;
    for hint in &pattern.description_hints {
        if contains_keyword(&description, hint) {
            hint_raw += weights.hint_each;
            breakdown
                .reasons
                .push(format!("Description hint: '{}' (+{})", hint, weights.hint_each));
        }
    }
    breakdown.hint_points = hint_raw.min(weights.hint_cap);
    if hint_raw > weights.hint_cap {
        breakdown
            .reasons
            .push(format!("Description hints capped at {}", weights.hint_cap));
    }

    // Spec indicators: field names compare case-insensitively, expected
    // values match word-boundary safe inside the actual value
    let mut spec_raw = 0;
    for (field, expected) in &pattern.spec_indicators {
        let wanted = normalize(field);
        let matched = product
            .specs
            .iter()
            .any(|(name, value)| normalize(name) == wanted && contains_keyword(value, expected));
        if matched {
            spec_raw += weights.spec_each;
            breakdown.reasons.push(format!(
                "Spec match: {} ~ '{}' (+{})",
                field, expected, weights.spec_each
            ));
        }
    }
    breakdown.spec_points = spec_raw.min(weights.spec_cap);

    // Domain tags against the product's combined context
    let mut domain_raw = 0;
    for domain in &pattern.domains {
        let in_text = contains_keyword(&combined, domain);
        let in_brand = product
            .brand
            .as_deref()
            .is_some_and(|brand| contains_keyword(brand, domain));
        let in_specs = product.specs.values().any(|value| contains_keyword(value, domain));
        if in_text || in_brand || in_specs {
            domain_raw += weights.domain_each;
            breakdown
                .reasons
                .push(format!("Domain tag: '{}' (+{})", domain, weights.domain_each));
        }
    }
    breakdown.domain_points = domain_raw.min(weights.domain_cap);

    breakdown.finalize();
    breakdown
}

/// Award the primary-position bonus across a product's full candidate set.
///
/// The candidate(s) whose winning title match sits leftmost in the title,
/// among all candidates that matched the title at all, get the bonus.
pub fn apply_primary_bonus(breakdowns: &mut [ScoreBreakdown], weights: &ScoreWeights) {
    let leftmost = breakdowns
        .iter()
        .filter(|b| !b.disqualified)
        .filter_map(|b| b.title_match.map(|m| m.position))
        .min();

    let Some(leftmost) = leftmost else {
        return;
    };

    for breakdown in breakdowns.iter_mut() {
        if breakdown.disqualified {
            continue;
        }
        if breakdown.title_match.is_some_and(|m| m.position == leftmost) {
            breakdown.bonus_points += weights.primary_bonus;
            breakdown.reasons.push(format!(
                "Primary position: leftmost title match (+{})",
                weights.primary_bonus
            ));
            breakdown.finalize();
        }
    }
}
