//! Sentence-level deduplication.
//!
//! Collapses exact and near-duplicate sentences (the same fact stated once
//! as prose and once as a bullet) while preserving input order. Before any
//! near-duplicate collapse the engine consults the flip guard
//! ([`crate::flip`]): lexically similar but semantically opposed sentences
//! are never collapsed. Deterministic and purely lexical, with no embeddings.
//!
//! The near-duplicate scan compares each incoming sentence against every
//! already-kept sentence, so a run is quadratic in the number of kept
//! sentences. That is fine at per-document sentence counts; very large
//! batches should be split per document (see
//! [`crate::Textscrub::process_documents`]).

use crate::config::PipelineConfig;
use crate::flip::{FlipSignature, PolarityLexicon};
use crate::math::math_density;
use crate::normalize::normalize_text_strong;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Default Jaccard similarity threshold for near-duplicates
pub const DEFAULT_NEAR_DUPE_JACCARD: f64 = 0.92;

/// Length clamp inside the cleanliness key. Kept from the source heuristic;
/// a tunable, not a principled threshold.
pub const CLEAN_LEN_CLAMP: usize = 200;

/// Light stopwords optionally dropped from the dedupe comparison form
const DEDUPE_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

static RE_NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s']").unwrap());

static RE_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Options for one dedupe run. Immutable for the duration of the run.
#[derive(Debug, Clone)]
pub struct DedupeOptions {
    /// Jaccard similarity at which two sentences count as near-duplicates.
    pub near_dupe_jaccard: f64,

    /// Whether the comparison form drops light stopwords.
    pub remove_stopwords: bool,

    /// Whether the strong normalization pipeline runs before the comparison
    /// form is computed. Output text is unaffected either way.
    pub strong_normalize: bool,

    /// Polarity vocabulary for the flip guard.
    pub lexicon: PolarityLexicon,
}

impl Default for DedupeOptions {
    fn default() -> Self {
        Self {
            near_dupe_jaccard: DEFAULT_NEAR_DUPE_JACCARD,
            remove_stopwords: false,
            strong_normalize: true,
            lexicon: PolarityLexicon::builtin(),
        }
    }
}

impl DedupeOptions {
    /// Builds dedupe options from a pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            near_dupe_jaccard: config.near_dupe_jaccard,
            remove_stopwords: config.remove_stopwords,
            strong_normalize: config.strong_normalize,
            lexicon: PolarityLexicon::builtin(),
        }
    }

    /// Replaces the polarity lexicon.
    pub fn with_lexicon(mut self, lexicon: PolarityLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }
}

/// Computes the comparison form used for duplicate detection.
///
/// Lowercases, replaces punctuation with spaces, collapses whitespace, and
/// optionally drops stopwords. This is deliberately lighter than what it
/// does to the output: the original sentence text always survives intact.
pub fn normalize_for_dedupe(text: &str, options: &DedupeOptions) -> String {
    let text = if options.strong_normalize {
        normalize_text_strong(text)
    } else {
        text.to_string()
    };
    let text = text.to_lowercase();
    let text = RE_NON_WORD.replace_all(&text, " ");
    let text = RE_WHITESPACE_RUN.replace_all(&text, " ");
    let text = text.trim();

    if options.remove_stopwords {
        text.split(' ')
            .filter(|token| !DEDUPE_STOPWORDS.contains(token))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        text.to_string()
    }
}

/// Jaccard similarity of two token sets.
///
/// Defined as 1.0 when both sets are empty and 0.0 when exactly one is.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Ordered cleanliness key: lower is cleaner. Used only to pick the
/// surviving variant of a collapsing pair.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CleanScore {
    non_ascii: usize,
    math_density: f64,
    neg_clamped_len: i64,
}

impl CleanScore {
    fn of(text: &str) -> Self {
        let non_ascii = text.chars().filter(|c| !c.is_ascii()).count();
        let length = text.chars().count().min(CLEAN_LEN_CLAMP);
        Self {
            non_ascii,
            math_density: math_density(text),
            neg_clamped_len: -(length as i64),
        }
    }

    /// Strict lexicographic less-than over the key tuple.
    fn is_cleaner_than(&self, other: &Self) -> bool {
        if self.non_ascii != other.non_ascii {
            return self.non_ascii < other.non_ascii;
        }
        // Densities are finite fractions in [0, 1]
        match self
            .math_density
            .partial_cmp(&other.math_density)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }
        self.neg_clamped_len < other.neg_clamped_len
    }
}

/// One surviving sentence with its cached comparison forms.
struct KeptSentence {
    text: String,
    norm: String,
    tokens: HashSet<String>,
}

impl KeptSentence {
    fn new(text: &str, norm: String, tokens: HashSet<String>) -> Self {
        Self {
            text: text.to_string(),
            norm,
            tokens,
        }
    }
}

/// Removes exact and near-duplicate sentences, preserving order.
///
/// For each sentence in input order:
///
/// 1. Whitespace-only sentences (and sentences whose comparison form is
///    empty) are dropped.
/// 2. A sentence whose comparison form was already kept is skipped: exact
///    duplicates collapse to the first occurrence.
/// 3. Otherwise the kept sentences are scanned in keep order; the first one
///    whose token-set Jaccard reaches the threshold decides the outcome.
///    A flip conflict blocks the collapse and both sentences survive.
///    Without a conflict the pair collapses and the cleaner variant wins,
///    replacing the kept slot in place when the newcomer is cleaner.
/// 4. With no match at all, the sentence is appended.
///
/// Never fails on malformed text.
///
/// # Example
///
/// ```
/// use textscrub::{dedupe_sentences, DedupeOptions};
///
/// let sentences = vec![
///     "The policy improves with more data.".to_string(),
///     "The policy improves with more data.".to_string(),
/// ];
/// let deduped = dedupe_sentences(&sentences, &DedupeOptions::default());
/// assert_eq!(deduped.len(), 1);
/// ```
pub fn dedupe_sentences(sentences: &[String], options: &DedupeOptions) -> Vec<String> {
    let mut kept: Vec<KeptSentence> = Vec::new();
    // Content-addressed exact-duplicate index: comparison form -> kept slot
    let mut slot_by_norm: HashMap<String, usize> = HashMap::new();

    for raw in sentences {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        let norm = normalize_for_dedupe(text, options);
        if norm.is_empty() {
            continue;
        }
        if slot_by_norm.contains_key(&norm) {
            continue;
        }
        let tokens: HashSet<String> = norm.split(' ').map(str::to_string).collect();

        let mut decided = false;
        for slot in 0..kept.len() {
            if jaccard(&tokens, &kept[slot].tokens) < options.near_dupe_jaccard {
                continue;
            }
            // Flip check runs on raw text: dedupe normalization may obscure
            // the very tokens the guard needs.
            let incoming = FlipSignature::of(text, &options.lexicon);
            let resident = FlipSignature::of(&kept[slot].text, &options.lexicon);
            if incoming.conflicts_with(&resident) {
                // Semantic opposition: both sentences survive.
                slot_by_norm.insert(norm.clone(), kept.len());
                kept.push(KeptSentence::new(text, norm.clone(), tokens.clone()));
            } else if CleanScore::of(text).is_cleaner_than(&CleanScore::of(&kept[slot].text)) {
                // Collapse, newcomer wins: replace in place, keep position.
                slot_by_norm.remove(&kept[slot].norm);
                slot_by_norm.insert(norm.clone(), slot);
                kept[slot] = KeptSentence::new(text, norm.clone(), tokens.clone());
            }
            // First sufficiently similar kept sentence decides.
            decided = true;
            break;
        }

        if !decided {
            slot_by_norm.insert(norm.clone(), kept.len());
            kept.push(KeptSentence::new(text, norm, tokens));
        }
    }

    kept.into_iter().map(|k| k.text).collect()
}

/// Dedupes with default options.
pub fn dedupe_sentences_default(sentences: &[String]) -> Vec<String> {
    dedupe_sentences(sentences, &DedupeOptions::default())
}
