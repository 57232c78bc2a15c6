//! # textscrub
//!
//! Deterministic normalization and sentence-level deduplication for text
//! extracted from scanned or converted documents (PDF/OCR textbooks).
//!
//! The library does two things:
//!
//! - **Repairs systematic extraction noise** (broken ligatures, hyphenated
//!   line wraps, stray control and arrow glyphs) without corrupting
//!   legitimate text ([`normalize_text_strong`]).
//! - **Collapses duplicate and near-duplicate sentences** while provably
//!   never collapsing sentences that are lexically similar but semantically
//!   opposed: negation, increase/decrease, max/min, always/never
//!   ([`dedupe_sentences`], [`FlipSignature`]).
//!
//! Everything is lexical, deterministic, and reproducible: no embeddings,
//! no model scoring. Every stage is a pure function that never fails on
//! malformed text.
//!
//! ## Quick Start
//!
//! ```
//! use textscrub::Textscrub;
//!
//! let sentences = vec![
//!     "The policy improves with more data.".to_string(),
//!     "The policy improves with more data.".to_string(),
//!     "The policy degrades without exploration.".to_string(),
//! ];
//!
//! let scrub = Textscrub::new();
//! let deduped = scrub.dedupe(&sentences);
//! assert_eq!(deduped.len(), 2);
//! ```

pub mod config;
pub mod dedupe;
pub mod error;
pub mod flip;
pub mod math;
pub mod normalize;

// Re-exports
pub use config::PipelineConfig;
pub use dedupe::{
    dedupe_sentences, dedupe_sentences_default, jaccard, normalize_for_dedupe, DedupeOptions,
    DEFAULT_NEAR_DUPE_JACCARD,
};
pub use error::{Error, Result};
pub use flip::{flip_tokens, FlipSignature, PolarityLexicon};
pub use math::{filter_math_heavy, is_math_heavy, math_density, DEFAULT_MATH_HEAVY_THRESHOLD};
pub use normalize::{
    normalize_for_study, normalize_text_strong, normalize_unicode_basics,
    repair_hyphenated_linebreaks, strip_inline_garbage, NormalizeOptions,
};

use rayon::prelude::*;

/// Builder for the full normalize + dedupe pipeline.
///
/// Provides a fluent API over [`PipelineConfig`] and [`DedupeOptions`] for
/// callers that process whole documents.
///
/// # Example
///
/// ```
/// use textscrub::Textscrub;
///
/// let scrub = Textscrub::new()
///     .with_jaccard(0.85)
///     .with_stopword_removal(true);
///
/// let cleaned = scrub.normalize("the di\u{21B5}erent af- terposition");
/// assert_eq!(cleaned, "the diferent afterposition");
/// ```
pub struct Textscrub {
    config: PipelineConfig,
    lexicon: PolarityLexicon,
    parallel: bool,
}

impl Default for Textscrub {
    fn default() -> Self {
        Self::new()
    }
}

impl Textscrub {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            lexicon: PolarityLexicon::builtin(),
            parallel: true,
        }
    }

    /// Creates a builder configured from the process environment.
    pub fn from_env() -> Self {
        Self {
            config: PipelineConfig::from_env(),
            ..Self::new()
        }
    }

    /// Creates a builder from an explicit configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Sets the near-duplicate Jaccard threshold.
    pub fn with_jaccard(mut self, threshold: f64) -> Self {
        self.config.near_dupe_jaccard = threshold;
        self
    }

    /// Enables stopword removal in the dedupe comparison form.
    pub fn with_stopword_removal(mut self, remove: bool) -> Self {
        self.config.remove_stopwords = remove;
        self
    }

    /// Sets the math-density cutoff.
    pub fn with_math_threshold(mut self, threshold: f64) -> Self {
        self.config.math_heavy_threshold = threshold;
        self
    }

    /// Disables the strong normalization pre-pass.
    pub fn without_strong_normalize(mut self) -> Self {
        self.config.strong_normalize = false;
        self
    }

    /// Replaces the polarity lexicon used by the flip guard.
    pub fn with_lexicon(mut self, lexicon: PolarityLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Disables cross-document parallelism in [`Self::process_documents`].
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn dedupe_options(&self) -> DedupeOptions {
        DedupeOptions::from_config(&self.config).with_lexicon(self.lexicon.clone())
    }

    /// Normalizes text per the configuration (passthrough when the strong
    /// pipeline is disabled).
    pub fn normalize(&self, text: &str) -> String {
        normalize_for_study(text, &self.config)
    }

    /// Returns true when a sentence is equation-heavy per the configured
    /// threshold.
    pub fn is_math_heavy(&self, text: &str) -> bool {
        is_math_heavy(text, self.config.math_heavy_threshold)
    }

    /// Dedupes one ordered sentence sequence. Output sentences keep their
    /// original text; only the comparison uses normalization.
    pub fn dedupe(&self, sentences: &[String]) -> Vec<String> {
        dedupe_sentences(sentences, &self.dedupe_options())
    }

    /// Dedupes one document and normalizes the survivors.
    pub fn process_document(&self, sentences: &[String]) -> Vec<String> {
        self.dedupe(sentences)
            .iter()
            .map(|s| self.normalize(s))
            .collect()
    }

    /// Processes independent documents, in parallel unless
    /// [`Self::sequential`] was set.
    ///
    /// Parallelism is across documents only. Within one document the dedupe
    /// scan is order-sensitive (which duplicate wins, and which pairs even
    /// meet the flip guard, depends on scan order) and stays sequential.
    pub fn process_documents(&self, documents: &[Vec<String>]) -> Vec<Vec<String>> {
        if self.parallel {
            documents
                .par_iter()
                .map(|doc| self.process_document(doc))
                .collect()
        } else {
            documents
                .iter()
                .map(|doc| self.process_document(doc))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builder_defaults() {
        let scrub = Textscrub::new();
        assert_eq!(scrub.config().near_dupe_jaccard, DEFAULT_NEAR_DUPE_JACCARD);
        assert_eq!(
            scrub.config().math_heavy_threshold,
            DEFAULT_MATH_HEAVY_THRESHOLD
        );
        assert!(scrub.config().strong_normalize);
    }

    #[test]
    fn test_builder_chain() {
        let scrub = Textscrub::new()
            .with_jaccard(0.8)
            .with_stopword_removal(true)
            .with_math_threshold(0.4)
            .without_strong_normalize()
            .sequential();
        assert_eq!(scrub.config().near_dupe_jaccard, 0.8);
        assert!(scrub.config().remove_stopwords);
        assert_eq!(scrub.config().math_heavy_threshold, 0.4);
        assert!(!scrub.config().strong_normalize);
    }

    #[test]
    fn test_normalize_passthrough_when_disabled() {
        let scrub = Textscrub::new().without_strong_normalize();
        let input = "af- terposition.....";
        assert_eq!(scrub.normalize(input), input);
    }

    #[test]
    fn test_dedupe_keeps_original_text() {
        // Output text is never rewritten by the comparison normalization
        let scrub = Textscrub::new();
        let sentences = strings(&["The E\u{FB00}ect Is Real.", "Another sentence entirely."]);
        let deduped = scrub.dedupe(&sentences);
        assert_eq!(deduped[0], "The E\u{FB00}ect Is Real.");
    }

    #[test]
    fn test_process_document_normalizes_survivors() {
        let scrub = Textscrub::new();
        let sentences = strings(&["The e\u{FB00}ect is real.", "The e\u{FB00}ect is real."]);
        let processed = scrub.process_document(&sentences);
        assert_eq!(processed, vec!["The effect is real."]);
    }

    #[test]
    fn test_process_documents_matches_sequential() {
        let documents: Vec<Vec<String>> = (0..8)
            .map(|i| {
                strings(&[
                    "A duplicate sentence about values.",
                    "A duplicate sentence about values.",
                    "A distinct sentence about rewards.",
                ])
                .into_iter()
                .chain(std::iter::once(format!("Document specific sentence {i}.")))
                .collect()
            })
            .collect();

        let parallel = Textscrub::new().process_documents(&documents);
        let sequential = Textscrub::new().sequential().process_documents(&documents);
        assert_eq!(parallel, sequential);
        for result in &parallel {
            assert_eq!(result.len(), 3);
        }
    }

    #[test]
    fn test_math_heavy_through_builder() {
        let scrub = Textscrub::new();
        assert!(scrub.is_math_heavy("E = mc^2 and x = y + z"));
        assert!(!scrub.is_math_heavy("The gradient descent algorithm minimizes the loss."));
    }

    #[test]
    fn test_custom_lexicon_drives_guard() {
        // A lexicon with a custom negation word blocks the collapse
        let mut lexicon = PolarityLexicon::builtin();
        lexicon.negation.insert("nae".to_string());

        let sentences = strings(&[
            "The method is nae stable under these conditions in practice and production.",
            "The method is stable under these conditions in practice and production.",
        ]);

        let blocked = Textscrub::new()
            .with_jaccard(0.8)
            .with_lexicon(lexicon)
            .dedupe(&sentences);
        assert_eq!(blocked.len(), 2);

        // With the builtin lexicon "nae" is not a flip word, so the pair
        // collapses at the same threshold.
        let collapsed = Textscrub::new().with_jaccard(0.8).dedupe(&sentences);
        assert_eq!(collapsed.len(), 1);
    }

    #[test]
    fn test_order_preserved_end_to_end() {
        let scrub = Textscrub::new();
        let sentences = strings(&[
            "Alpha sentence stands alone.",
            "Beta sentence stands alone.",
            "Alpha sentence stands alone.",
            "Gamma sentence stands alone.",
        ]);
        let deduped = scrub.dedupe(&sentences);
        assert_eq!(
            deduped,
            strings(&[
                "Alpha sentence stands alone.",
                "Beta sentence stands alone.",
                "Gamma sentence stands alone.",
            ])
        );
    }
}
