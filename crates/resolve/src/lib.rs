//! Cross-type resolution and the top-level classification pipeline.
//!
//! Takes the full set of per-type breakdowns for one product and produces
//! the final `ClassificationResult`: threshold filtering, margin-based
//! tie-breaking (leftmost title position, then phrase specificity, then
//! alphabetical fallback), and Unknown reason codes for the rest.

use std::cmp::Ordering;

use prodtype_catalog::Catalog;
use prodtype_model::{
    Alternate, ClassificationResult, ConfidenceLevel, Product, ScoreBreakdown, UnknownReason,
};
use prodtype_score::{apply_primary_bonus, score_pattern, ScoreWeights};

/// Configuration for the resolver.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Minimum score a candidate must reach to be classifiable
    pub min_score: u32,
    /// Two candidates this close are tied and go to positional tie-breaking
    pub tie_margin: u32,
    /// How many runner-ups to surface on the result
    pub max_alternates: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            min_score: 15,
            tie_margin: 2,
            max_alternates: 3,
        }
    }
}

/// Resolve one product's per-type breakdowns into a final decision.
pub fn resolve(
    product: &Product,
    breakdowns: Vec<ScoreBreakdown>,
    config: &ResolveConfig,
) -> ClassificationResult {
    if !product.has_text() {
        return ClassificationResult::unknown(
            UnknownReason::MissingData,
            "Product has no title or description",
        );
    }

    let all_zero = breakdowns.iter().all(|b| b.total == 0);
    let best_score = breakdowns.iter().map(|b| b.total).max().unwrap_or(0);

    let mut candidates: Vec<ScoreBreakdown> = breakdowns
        .into_iter()
        .filter(|b| b.total >= config.min_score)
        .collect();

    if candidates.is_empty() {
        if all_zero {
            return ClassificationResult::unknown(
                UnknownReason::NoPatternMatch,
                "No pattern matched any signal",
            );
        }
        return ClassificationResult::unknown(
            UnknownReason::BelowThreshold,
            format!(
                "Best score {} below minimum {}",
                best_score, config.min_score
            ),
        );
    }

    // Total, deterministic base order: score descending, name ascending.
    candidates.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.type_name.cmp(&b.type_name))
    });

    // Candidates within the margin of the top score are tied; pick the
    // winner among them by position, then specificity, then name.
    let top = candidates[0].total;
    let contenders = candidates
        .iter()
        .position(|b| top - b.total > config.tie_margin)
        .unwrap_or(candidates.len());
    let winner_index = (0..contenders)
        .min_by(|&a, &b| tie_break(&candidates[a], &candidates[b]))
        .unwrap_or(0);
    let winner = candidates.remove(winner_index);

    let alternates = candidates
        .into_iter()
        .take(config.max_alternates)
        .map(|b| Alternate {
            type_name: b.type_name,
            score: b.total,
        })
        .collect();

    let confidence = winner.total.min(100);
    ClassificationResult {
        product_type: winner.type_name,
        confidence,
        confidence_level: ConfidenceLevel::from_score(confidence),
        reasons: winner.reasons,
        alternates,
        unknown_reason: None,
    }
}

/// Order tied candidates: leftmost title match wins, then the longer
/// matched phrase, then alphabetical type name.
fn tie_break(a: &ScoreBreakdown, b: &ScoreBreakdown) -> Ordering {
    let position = |m: &ScoreBreakdown| m.title_match.map_or(usize::MAX, |t| t.position);
    let specificity = |m: &ScoreBreakdown| m.title_match.map_or(0, |t| t.word_count);

    position(a)
        .cmp(&position(b))
        .then_with(|| specificity(b).cmp(&specificity(a)))
        .then_with(|| a.type_name.cmp(&b.type_name))
}

/// Classify one product against a validated catalog.
///
/// Scores every pattern in catalog order, awards the cross-candidate
/// primary-position bonus, and resolves. Always returns a result, never
/// an error: unclassifiable products come back as Unknown.
pub fn classify(
    product: &Product,
    catalog: &Catalog,
    weights: &ScoreWeights,
    config: &ResolveConfig,
) -> ClassificationResult {
    if !product.has_text() {
        return ClassificationResult::unknown(
            UnknownReason::MissingData,
            "Product has no title or description",
        );
    }

    let mut breakdowns: Vec<ScoreBreakdown> = catalog
        .iter()
        .map(|pattern| score_pattern(product, pattern, weights))
        .collect();
    apply_primary_bonus(&mut breakdowns, weights);

    let result = resolve(product, breakdowns, config);
    tracing::debug!(
        title = %product.title,
        product_type = %result.product_type,
        confidence = result.confidence,
        "Classified product"
    );
    result
}

/// Classify a batch of products, preserving input order.
pub fn classify_all(
    products: &[Product],
    catalog: &Catalog,
    weights: &ScoreWeights,
    config: &ResolveConfig,
) -> Vec<ClassificationResult> {
    products
        .iter()
        .map(|product| classify(product, catalog, weights, config))
        .collect()
}
