//! Human-readable rendering of classification results.
//!
//! Converts a `ClassificationResult` into text suitable for CLI output
//! and reports. Rendering only; no scoring logic lives here.

use prodtype_model::{ClassificationResult, ConfidenceLevel, UnknownReason};

/// One-line headline for a result.
pub fn summarize(result: &ClassificationResult) -> String {
    if let Some(reason) = result.unknown_reason {
        return format!("UNKNOWN: {}", unknown_reason_text(reason));
    }

    let level = match result.confidence_level {
        ConfidenceLevel::High => "HIGH CONFIDENCE",
        ConfidenceLevel::Medium => "MEDIUM CONFIDENCE",
        ConfidenceLevel::Low => "LOW CONFIDENCE",
    };
    format!("{}: {} ({})", level, result.product_type, result.confidence)
}

/// Plain-language phrasing for an Unknown reason code.
pub fn unknown_reason_text(reason: UnknownReason) -> &'static str {
    match reason {
        UnknownReason::NoPatternMatch => "no pattern matched any signal",
        UnknownReason::BelowThreshold => "no pattern cleared the minimum score",
        UnknownReason::MissingData => "product has no title or description",
    }
}

/// The full reason trail, one indented line per award.
pub fn format_reasons(result: &ClassificationResult) -> String {
    result
        .reasons
        .iter()
        .map(|r| format!("  - {r}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runner-up listing, e.g. "Load Center (95), Wall Sconce (24)".
pub fn format_alternates(result: &ClassificationResult) -> String {
    result
        .alternates
        .iter()
        .map(|a| format!("{} ({})", a.type_name, a.score))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodtype_model::Alternate;

    fn classified(product_type: &str, confidence: u32) -> ClassificationResult {
        ClassificationResult {
            product_type: product_type.to_string(),
            confidence,
            confidence_level: ConfidenceLevel::from_score(confidence),
            reasons: vec!["Title exact match: 'circuit breaker' (+95)".to_string()],
            alternates: vec![Alternate {
                type_name: "Load Center".to_string(),
                score: 95,
            }],
            unknown_reason: None,
        }
    }

    #[test]
    fn test_summarize_levels() {
        assert_eq!(
            summarize(&classified("Circuit Breaker", 100)),
            "HIGH CONFIDENCE: Circuit Breaker (100)"
        );
        assert_eq!(
            summarize(&classified("Circuit Breaker", 75)),
            "MEDIUM CONFIDENCE: Circuit Breaker (75)"
        );
        assert_eq!(
            summarize(&classified("Circuit Breaker", 40)),
            "LOW CONFIDENCE: Circuit Breaker (40)"
        );
    }

    #[test]
    fn test_summarize_unknown() {
        let result = ClassificationResult::unknown(
            UnknownReason::MissingData,
            "Product has no title or description",
        );
        assert_eq!(summarize(&result), "UNKNOWN: product has no title or description");
    }

    #[test]
    fn test_format_reasons() {
        let text = format_reasons(&classified("Circuit Breaker", 100));
        assert_eq!(text, "  - Title exact match: 'circuit breaker' (+95)");
    }

    #[test]
    fn test_format_alternates() {
        assert_eq!(
            format_alternates(&classified("Circuit Breaker", 100)),
            "Load Center (95)"
        );
    }
}
