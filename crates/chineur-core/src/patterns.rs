//! Attribute pattern registry: named text-matching rules with a resale unit
//! value, loaded from a YAML file and compiled for case-insensitive
//! detection over listing text.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ConfigError;

/// One configurable detection rule: a regex source matched
/// case-insensitively, and the resale value of a single matched unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributePattern {
    pub key: String,
    pub rule: String,
    pub unit_value: f64,
}

#[derive(Debug, Deserialize)]
pub struct PatternsFile {
    pub patterns: Vec<AttributePattern>,
}

/// Load and validate the attribute pattern registry from a YAML file.
///
/// Validation rejects structural problems (empty or duplicate keys,
/// negative unit values). Rule syntax is deliberately NOT validated here;
/// a malformed rule is skipped per-key at compile time so one bad entry
/// cannot take down the rest of the registry.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_patterns(path: &Path) -> Result<PatternsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PatternsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let patterns_file: PatternsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::PatternsFileParse)?;

    validate_patterns(&patterns_file)?;

    Ok(patterns_file)
}

fn validate_patterns(patterns_file: &PatternsFile) -> Result<(), ConfigError> {
    let mut seen_keys = HashSet::new();

    for pattern in &patterns_file.patterns {
        if pattern.key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "attribute key must be non-empty".to_string(),
            ));
        }

        if pattern.unit_value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "attribute '{}' has negative unit value {}",
                pattern.key, pattern.unit_value
            )));
        }

        let lower_key = pattern.key.to_lowercase();
        if !seen_keys.insert(lower_key) {
            return Err(ConfigError::Validation(format!(
                "duplicate attribute key: '{}'",
                pattern.key
            )));
        }
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid rule for attribute '{key}': {source}")]
    InvalidRule {
        key: String,
        #[source]
        source: regex::Error,
    },
}

struct CompiledPattern {
    key: String,
    regex: Regex,
    unit_value: f64,
}

/// Registry compiled for detection. Entries whose rule failed to compile
/// are absent; the failures are reported alongside the set.
pub struct PatternSet {
    entries: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Compile every rule case-insensitively. A rule that fails to compile
    /// is skipped and reported; it never blocks the other keys.
    #[must_use]
    pub fn compile(patterns: &[AttributePattern]) -> (Self, Vec<PatternError>) {
        let mut entries = Vec::with_capacity(patterns.len());
        let mut failures = Vec::new();

        for pattern in patterns {
            match RegexBuilder::new(&pattern.rule)
                .case_insensitive(true)
                .build()
            {
                Ok(regex) => entries.push(CompiledPattern {
                    key: pattern.key.clone(),
                    regex,
                    unit_value: pattern.unit_value,
                }),
                Err(e) => {
                    tracing::warn!(key = %pattern.key, error = %e, "skipping malformed attribute rule");
                    failures.push(PatternError::InvalidRule {
                        key: pattern.key.clone(),
                        source: e,
                    });
                }
            }
        }

        (Self { entries }, failures)
    }

    /// Attribute key to unit resale value, for the valuation engine.
    #[must_use]
    pub fn value_table(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.unit_value))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count non-overlapping matches of every compiled rule in `text`.
///
/// Keys with zero matches are omitted rather than reported as zero.
#[must_use]
pub fn detect(text: &str, patterns: &PatternSet) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();

    for entry in &patterns.entries {
        let n = entry.regex.find_iter(text).count();
        if n > 0 {
            counts.insert(entry.key.clone(), u32::try_from(n).unwrap_or(u32::MAX));
        }
    }

    counts
}
