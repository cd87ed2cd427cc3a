//! Core domain model for prodtype product classification.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `Product`: The input record to classify
//! - `Pattern`: The rule set recognizing one product type
//! - `ScoreBreakdown`: Per-(product, pattern) scoring detail
//! - `ClassificationResult`: The final decision for one product

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel label for products no pattern could claim.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// A retail product record, as produced by the ingestion pipeline.
///
/// The classifier never mutates a product; absent fields deserialize to
/// empty strings or empty maps rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    /// Product title (may be empty)
    #[serde(default)]
    pub title: String,

    /// Long-form description (may be empty)
    #[serde(default)]
    pub description: String,

    /// Brand name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Structured specification fields (name -> value)
    #[serde(default)]
    pub specs: BTreeMap<String, String>,

    /// Listed price; carried through but unused by scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Product {
    /// Create a minimal product for testing.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_spec(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.specs.insert(name.into(), value.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Whether this product has any usable text to match against.
    pub fn has_text(&self) -> bool {
        !self.title.trim().is_empty() || !self.description.trim().is_empty()
    }
}

/// The rule set defining how one product type is recognized.
///
/// Patterns are authored configuration, loaded and validated once by
/// `prodtype-catalog` and treated as read-only during classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pattern {
    /// Unique taxonomy key, e.g. "Circuit Breaker"
    pub type_name: String,

    /// Primary positive signals; phrase order is preserved
    #[serde(default)]
    pub strong_keywords: Vec<String>,

    /// Cumulative supporting signals, capped during scoring
    #[serde(default)]
    pub weak_keywords: Vec<String>,

    /// Candidate disqualifiers, subject to disambiguation
    #[serde(default)]
    pub negative_keywords: Vec<String>,

    /// Phrases searched only in the description field
    #[serde(default)]
    pub description_hints: Vec<String>,

    /// Spec-field name -> expected value fragment
    #[serde(default)]
    pub spec_indicators: BTreeMap<String, String>,

    /// Broad category tags for coarse cross-checking, e.g. "lighting"
    #[serde(default)]
    pub domains: Vec<String>,
}

impl Pattern {
    /// Create a pattern with strong keywords only, for testing.
    pub fn new(type_name: impl Into<String>, strong_keywords: &[&str]) -> Self {
        Self {
            type_name: type_name.into(),
            strong_keywords: strong_keywords.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_weak(mut self, keywords: &[&str]) -> Self {
        self.weak_keywords = keywords.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_negative(mut self, keywords: &[&str]) -> Self {
        self.negative_keywords = keywords.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_hints(mut self, hints: &[&str]) -> Self {
        self.description_hints = hints.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_domains(mut self, domains: &[&str]) -> Self {
        self.domains = domains.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_spec_indicator(
        mut self,
        field: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        self.spec_indicators.insert(field.into(), expected.into());
        self
    }
}

/// Which title-match tier a strong keyword landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Single-word strong keyword found in title
    SingleWord,
    /// Multi-word keyword whose words appear in order, not contiguous
    OrderedPartial,
    /// Exact contiguous multi-word phrase in title
    ExactPhrase,
}

/// The winning title match for one pattern, kept for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMatch {
    /// Char offset of the match in the normalized title (leftmost occurrence)
    pub position: usize,
    /// Number of words in the matched phrase
    pub word_count: usize,
    pub tier: MatchTier,
}

/// Scoring detail for one (product, pattern) pair.
///
/// Subtotals are pre-cap per category; `total` is the capped final score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// The pattern this breakdown was computed for
    pub type_name: String,

    pub title_points: u32,
    pub description_points: u32,
    pub weak_points: u32,
    pub hint_points: u32,
    pub spec_points: u32,
    pub domain_points: u32,
    pub bonus_points: u32,

    /// Human-readable trail of every award and penalty
    pub reasons: Vec<String>,

    /// Final score, capped to 0..=100
    pub total: u32,

    /// A negative keyword survived disambiguation; total is 0
    #[serde(default)]
    pub disqualified: bool,

    /// Winning title match, if any, for resolver tie-breaking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_match: Option<TitleMatch>,
}

impl ScoreBreakdown {
    /// An empty breakdown for a pattern that matched nothing.
    pub fn empty(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            title_points: 0,
            description_points: 0,
            weak_points: 0,
            hint_points: 0,
            spec_points: 0,
            domain_points: 0,
            bonus_points: 0,
            reasons: Vec::new(),
            total: 0,
            disqualified: false,
            title_match: None,
        }
    }

    /// A zeroed breakdown for a pattern killed by a negative keyword.
    pub fn disqualified(type_name: impl Into<String>, keyword: &str) -> Self {
        let mut b = Self::empty(type_name);
        b.disqualified = true;
        b.reasons.push(format!("Disqualified by '{keyword}'"));
        b
    }

    /// Recompute `total` from the category subtotals, capped at 100.
    pub fn finalize(&mut self) {
        if self.disqualified {
            self.total = 0;
            return;
        }
        let sum = self.title_points
            + self.description_points
            + self.weak_points
            + self.hint_points
            + self.spec_points
            + self.domain_points
            + self.bonus_points;
        self.total = sum.min(100);
    }
}

/// Confidence bucket for a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Bucket a 0-100 score: High >= 90, Medium 70-89, Low < 70.
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::High,
            70..=89 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Why a product resolved to "Unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownReason {
    /// Every pattern scored exactly zero
    NoPatternMatch,
    /// Some pattern scored, but none cleared the minimum threshold
    BelowThreshold,
    /// Title and description were both empty
    MissingData,
}

/// A runner-up candidate surfaced for transparency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternate {
    pub type_name: String,
    pub score: u32,
}

/// The final decision for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// A pattern's `type_name`, or `"Unknown"`
    pub product_type: String,

    /// Winning score, 0..=100
    pub confidence: u32,

    pub confidence_level: ConfidenceLevel,

    /// The winner's scoring trail, retained for explainability
    #[serde(default)]
    pub reasons: Vec<String>,

    /// Runner-ups in descending score order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<Alternate>,

    /// Set only when `product_type == "Unknown"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_reason: Option<UnknownReason>,
}

impl ClassificationResult {
    /// Build an Unknown result with the given reason code.
    pub fn unknown(reason: UnknownReason, detail: impl Into<String>) -> Self {
        Self {
            product_type: UNKNOWN_TYPE.to_string(),
            confidence: 0,
            confidence_level: ConfidenceLevel::Low,
            reasons: vec![detail.into()],
            alternates: Vec::new(),
            unknown_reason: Some(reason),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.unknown_reason.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_has_text() {
        assert!(Product::new("Wall Sconce", "").has_text());
        assert!(Product::new("", "A two-light fixture").has_text());
        assert!(!Product::new("", "").has_text());
        assert!(!Product::new("   ", " \t ").has_text());
    }

    #[test]
    fn test_product_serialization() {
        let product = Product::new("GE Circuit Breaker", "20 amp single pole")
            .with_brand("GE")
            .with_spec("Amperage", "20");
        let json = serde_json::to_string(&product).unwrap();
        let parsed: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.title, "GE Circuit Breaker");
        assert_eq!(parsed.brand.as_deref(), Some("GE"));
        assert_eq!(parsed.specs.get("Amperage").map(String::as_str), Some("20"));
    }

    #[test]
    fn test_sparse_product_deserializes() {
        let parsed: Product = serde_json::from_str(r#"{"title": "Area Rug"}"#).unwrap();
        assert_eq!(parsed.title, "Area Rug");
        assert_eq!(parsed.description, "");
        assert!(parsed.specs.is_empty());
        assert!(parsed.price.is_none());
    }

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(ConfidenceLevel::from_score(100), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(90), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(89), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(70), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(69), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0), ConfidenceLevel::Low);
    }

    #[test]
    fn test_breakdown_finalize_caps_at_100() {
        let mut b = ScoreBreakdown::empty("Chandelier");
        b.title_points = 95;
        b.weak_points = 24;
        b.bonus_points = 10;
        b.finalize();
        assert_eq!(b.total, 100);
    }

    #[test]
    fn test_disqualified_breakdown_stays_zero() {
        let mut b = ScoreBreakdown::disqualified("LED Light Bulb", "chandelier");
        b.title_points = 95;
        b.finalize();
        assert_eq!(b.total, 0);
        assert!(b.reasons[0].contains("Disqualified"));
    }

    #[test]
    fn test_unknown_reason_serde_names() {
        let json = serde_json::to_string(&UnknownReason::BelowThreshold).unwrap();
        assert_eq!(json, "\"below_threshold\"");
        let json = serde_json::to_string(&UnknownReason::MissingData).unwrap();
        assert_eq!(json, "\"missing_data\"");
        let json = serde_json::to_string(&UnknownReason::NoPatternMatch).unwrap();
        assert_eq!(json, "\"no_pattern_match\"");
    }

    #[test]
    fn test_unknown_result() {
        let result =
            ClassificationResult::unknown(UnknownReason::MissingData, "No title or description");
        assert!(result.is_unknown());
        assert_eq!(result.product_type, UNKNOWN_TYPE);
        assert_eq!(result.confidence, 0);
        assert_eq!(result.confidence_level, ConfidenceLevel::Low);
    }
}
