//! Pattern catalog loading and validation.
//!
//! A `Catalog` is the immutable, validated set of `Pattern` rules for one
//! classification run. It is built once (from JSON or in-memory patterns),
//! checked for internal consistency, and then passed by reference into
//! every scoring call; nothing mutates it after construction. Iteration
//! order is the authored order, so runs are reproducible.

use std::collections::HashSet;
use std::path::Path;

use prodtype_model::Pattern;
use thiserror::Error;

/// Errors from catalog construction. All of these are fatal: a malformed
/// catalog aborts the run rather than silently misclassifying.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog is empty")]
    Empty,

    #[error("Duplicate type name: '{0}'")]
    DuplicateTypeName(String),

    #[error("Pattern with empty type name at index {0}")]
    EmptyTypeName(usize),

    #[error("Pattern '{type_name}' has an empty {field} entry")]
    EmptyKeyword {
        type_name: String,
        field: &'static str,
    },
}

/// An immutable, validated pattern catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    patterns: Vec<Pattern>,
}

impl Catalog {
    /// Build a catalog from patterns, validating as per the catalog contract:
    /// non-empty, globally unique type names, no empty keyword entries.
    pub fn from_patterns(patterns: Vec<Pattern>) -> Result<Self, CatalogError> {
        if patterns.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, pattern) in patterns.iter().enumerate() {
            if pattern.type_name.trim().is_empty() {
                return Err(CatalogError::EmptyTypeName(index));
            }
            if !seen.insert(pattern.type_name.clone()) {
                return Err(CatalogError::DuplicateTypeName(pattern.type_name.clone()));
            }
            validate_phrases(pattern, "strong_keywords", &pattern.strong_keywords)?;
            validate_phrases(pattern, "weak_keywords", &pattern.weak_keywords)?;
            validate_phrases(pattern, "negative_keywords", &pattern.negative_keywords)?;
            validate_phrases(pattern, "description_hints", &pattern.description_hints)?;
        }

        tracing::debug!(patterns = patterns.len(), "Catalog validated");
        Ok(Self { patterns })
    }

    /// Parse and validate a catalog from a JSON array of patterns.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let patterns: Vec<Pattern> = serde_json::from_str(json)?;
        Self::from_patterns(patterns)
    }

    /// Load and validate a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading catalog");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn get(&self, type_name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.type_name == type_name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn validate_phrases(
    pattern: &Pattern,
    field: &'static str,
    phrases: &[String],
) -> Result<(), CatalogError> {
    if phrases.iter().any(|p| p.trim().is_empty()) {
        return Err(CatalogError::EmptyKeyword {
            type_name: pattern.type_name.clone(),
            field,
        });
    }
    Ok(())
}
