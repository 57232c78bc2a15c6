//! Pipeline configuration.
//!
//! Configuration is an explicit value constructed once by the caller and
//! threaded into every stage as a parameter. [`PipelineConfig::from_env`]
//! reads the documented environment variables; malformed values fall back
//! silently to defaults so a misconfigured deployment cannot halt a batch.

use crate::dedupe::DEFAULT_NEAR_DUPE_JACCARD;
use crate::math::DEFAULT_MATH_HEAVY_THRESHOLD;
use std::env;

/// Toggles the strong normalization pre-pass ("1" default; "0"/"false"/"no" disable)
pub const ENV_STRONG_NORMALIZE: &str = "STRONG_NORMALIZE_ENABLED";

/// Math-density cutoff override (default 0.30)
pub const ENV_MATH_HEAVY_THRESHOLD: &str = "MATH_HEAVY_THRESHOLD";

/// Near-duplicate Jaccard threshold override (default 0.92)
pub const ENV_NEAR_DUPE_JACCARD: &str = "DEDUPE_NEAR_JACCARD";

/// Options for the normalization + dedupe pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Whether the strong normalization pipeline runs before study-artifact
    /// processing.
    pub strong_normalize: bool,

    /// Density cutoff for classifying a sentence as math-heavy.
    pub math_heavy_threshold: f64,

    /// Jaccard similarity at which two sentences are near-duplicates.
    pub near_dupe_jaccard: f64,

    /// Whether dedupe normalization drops light stopwords.
    pub remove_stopwords: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strong_normalize: true,
            math_heavy_threshold: DEFAULT_MATH_HEAVY_THRESHOLD,
            near_dupe_jaccard: DEFAULT_NEAR_DUPE_JACCARD,
            remove_stopwords: false,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from a variable lookup.
    ///
    /// [`Self::from_env`] passes the process environment; tests can pass a
    /// closure over a map instead of mutating global state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_STRONG_NORMALIZE) {
            config.strong_normalize = parse_enabled(&value);
        }
        if let Some(value) = lookup(ENV_MATH_HEAVY_THRESHOLD) {
            if let Ok(threshold) = value.trim().parse::<f64>() {
                config.math_heavy_threshold = threshold;
            }
        }
        if let Some(value) = lookup(ENV_NEAR_DUPE_JACCARD) {
            if let Ok(threshold) = value.trim().parse::<f64>() {
                config.near_dupe_jaccard = threshold;
            }
        }
        config
    }

    /// Sets the near-duplicate Jaccard threshold.
    pub fn with_jaccard(mut self, threshold: f64) -> Self {
        self.near_dupe_jaccard = threshold;
        self
    }

    /// Sets the math-density cutoff.
    pub fn with_math_threshold(mut self, threshold: f64) -> Self {
        self.math_heavy_threshold = threshold;
        self
    }

    /// Enables stopword removal in dedupe normalization.
    pub fn with_stopword_removal(mut self, remove: bool) -> Self {
        self.remove_stopwords = remove;
        self
    }

    /// Disables the strong normalization pre-pass.
    pub fn without_strong_normalize(mut self) -> Self {
        self.strong_normalize = false;
        self
    }
}

/// Parses an enabled/disabled flag; anything but "0"/"false"/"no" enables.
fn parse_enabled(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no"
    )
}
