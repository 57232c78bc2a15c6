//! Flip signatures: the meaning-preserving guardrail for near-dedupe.
//!
//! Two sentences can share almost every token and still state opposite
//! facts ("the error increases" / "the error decreases"). Before the dedupe
//! engine collapses a near-duplicate pair it computes a [`FlipSignature`]
//! for each side (a presence flag per polarity category) and refuses the
//! collapse when the signatures conflict.
//!
//! The polarity vocabulary is data, not code: [`PolarityLexicon`] carries a
//! format version and can be loaded from JSON, so expanding domain coverage
//! is a table change. The builtin default covers English negation,
//! direction, extremum, and absolute terms.

use crate::error::{Error, Result};
use crate::normalize::normalize_text_strong;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Lexicon format version this build understands
pub const LEXICON_FORMAT_VERSION: u32 = 1;

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "none", "neither", "without", "cannot", "can't", "won't", "isn't",
    "aren't", "doesn't", "don't", "didn't",
];

const INCREASE_WORDS: &[&str] = &[
    "increase",
    "increases",
    "increased",
    "increasing",
    "rise",
    "rises",
    "rising",
    "grow",
    "grows",
    "growing",
    "higher",
    "more",
    "greater",
    "larger",
    "maximize",
    "maximizes",
    "maximum",
    "max",
];

const DECREASE_WORDS: &[&str] = &[
    "decrease",
    "decreases",
    "decreased",
    "decreasing",
    "drop",
    "drops",
    "dropping",
    "lower",
    "less",
    "smaller",
    "minimize",
    "minimizes",
    "minimum",
    "min",
    "fewer",
];

const GREATER_WORDS: &[&str] = &["greater", "larger"];
const LESS_WORDS: &[&str] = &["less", "smaller"];
const MAX_WORDS: &[&str] = &["max", "maximum", "maximize", "maximizes"];
const MIN_WORDS: &[&str] = &["min", "minimum", "minimize", "minimizes"];
const HIGHER_WORDS: &[&str] = &["higher"];
const LOWER_WORDS: &[&str] = &["lower"];
const MORE_WORDS: &[&str] = &["more"];
const FEWER_WORDS: &[&str] = &["fewer"];
const ALWAYS_WORDS: &[&str] = &["always", "all", "every", "must"];
const NEVER_WORDS: &[&str] = &["never", "none", "cannot", "can't", "won't"];

/// Versioned polarity vocabulary tables.
///
/// Each field is the token set for one polarity category. Categories
/// overlap on purpose: "higher" belongs to both the broad `increase` set
/// and the narrow `higher` set, mirroring the pairwise conflict rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolarityLexicon {
    /// Format version of the table (see [`LEXICON_FORMAT_VERSION`]).
    pub version: u32,
    pub negation: HashSet<String>,
    pub increase: HashSet<String>,
    pub decrease: HashSet<String>,
    pub greater: HashSet<String>,
    pub less: HashSet<String>,
    pub max: HashSet<String>,
    pub min: HashSet<String>,
    pub higher: HashSet<String>,
    pub lower: HashSet<String>,
    pub more: HashSet<String>,
    pub fewer: HashSet<String>,
    pub always: HashSet<String>,
    pub never: HashSet<String>,
}

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PolarityLexicon {
    /// Returns the builtin English lexicon.
    pub fn builtin() -> Self {
        Self {
            version: LEXICON_FORMAT_VERSION,
            negation: word_set(NEGATION_WORDS),
            increase: word_set(INCREASE_WORDS),
            decrease: word_set(DECREASE_WORDS),
            greater: word_set(GREATER_WORDS),
            less: word_set(LESS_WORDS),
            max: word_set(MAX_WORDS),
            min: word_set(MIN_WORDS),
            higher: word_set(HIGHER_WORDS),
            lower: word_set(LOWER_WORDS),
            more: word_set(MORE_WORDS),
            fewer: word_set(FEWER_WORDS),
            always: word_set(ALWAYS_WORDS),
            never: word_set(NEVER_WORDS),
        }
    }

    /// Loads a lexicon from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let lexicon: Self = serde_json::from_str(json)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Loads a lexicon from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.version != LEXICON_FORMAT_VERSION {
            return Err(Error::UnsupportedLexiconVersion(self.version));
        }
        for (name, set) in [
            ("negation", &self.negation),
            ("increase", &self.increase),
            ("decrease", &self.decrease),
            ("greater", &self.greater),
            ("less", &self.less),
            ("max", &self.max),
            ("min", &self.min),
            ("higher", &self.higher),
            ("lower", &self.lower),
            ("more", &self.more),
            ("fewer", &self.fewer),
            ("always", &self.always),
            ("never", &self.never),
        ] {
            if set.is_empty() {
                return Err(Error::InvalidLexicon(format!("empty category: {name}")));
            }
        }
        Ok(())
    }
}

/// Tokenizes text for the flip check.
///
/// Runs the strong normalization first (so broken glyphs cannot hide a
/// polarity word), lowercases, and strips edge punctuation while keeping
/// internal apostrophes, since "can't." must still match the negation table.
/// No stopword removal: negation words are stopword-shaped.
pub fn flip_tokens(text: &str) -> Vec<String> {
    let normalized = normalize_text_strong(text).to_lowercase();
    normalized
        .split_whitespace()
        .filter_map(|token| {
            let token =
                token.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_' || c == '\''));
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        })
        .collect()
}

/// Presence flags over the polarity categories of one sentence.
///
/// Computed purely from lexical token membership; never mutated after
/// creation. Signatures are only meaningful pairwise, via
/// [`FlipSignature::conflicts_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipSignature {
    pub negation: bool,
    pub increase: bool,
    pub decrease: bool,
    pub greater: bool,
    pub less: bool,
    pub max: bool,
    pub min: bool,
    pub higher: bool,
    pub lower: bool,
    pub more: bool,
    pub fewer: bool,
    pub always: bool,
    pub never: bool,
}

impl FlipSignature {
    /// Computes the signature of raw sentence text against a lexicon.
    pub fn of(text: &str, lexicon: &PolarityLexicon) -> Self {
        let tokens: HashSet<String> = flip_tokens(text).into_iter().collect();
        let has = |set: &HashSet<String>| tokens.iter().any(|t| set.contains(t));
        Self {
            negation: has(&lexicon.negation),
            increase: has(&lexicon.increase),
            decrease: has(&lexicon.decrease),
            greater: has(&lexicon.greater),
            less: has(&lexicon.less),
            max: has(&lexicon.max),
            min: has(&lexicon.min),
            higher: has(&lexicon.higher),
            lower: has(&lexicon.lower),
            more: has(&lexicon.more),
            fewer: has(&lexicon.fewer),
            always: has(&lexicon.always),
            never: has(&lexicon.never),
        }
    }

    /// Returns true when two signatures indicate semantic opposition.
    ///
    /// All rules are symmetric. A collapse between conflicting sentences
    /// would silently delete one side of a contradiction, so the dedupe
    /// engine treats a conflict as a hard block.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        if self.negation != other.negation {
            return true;
        }
        let opposed = |a: bool, b: bool, c: bool, d: bool| (a && d) || (c && b);
        opposed(self.increase, self.decrease, other.increase, other.decrease)
            || opposed(self.max, self.min, other.max, other.min)
            || opposed(self.higher, self.lower, other.higher, other.lower)
            || opposed(self.more, self.less, other.more, other.less)
            || opposed(self.more, self.fewer, other.more, other.fewer)
            || opposed(self.greater, self.less, other.greater, other.less)
            || opposed(self.always, self.never, other.always, other.never)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(text: &str) -> FlipSignature {
        FlipSignature::of(text, &PolarityLexicon::builtin())
    }

    #[test]
    fn test_flip_tokens_strip_edge_punctuation() {
        let tokens = flip_tokens("It doesn't, converge.");
        assert_eq!(tokens, vec!["it", "doesn't", "converge"]);
    }

    #[test]
    fn test_flip_tokens_empty_input() {
        assert!(flip_tokens("").is_empty());
        assert!(flip_tokens("!!! ...").is_empty());
    }

    #[test]
    fn test_flip_tokens_see_through_artifacts() {
        // A ligature glyph must not hide a polarity word
        let tokens = flip_tokens("the e\u{FB00}ect never vanishes");
        assert!(tokens.contains(&"never".to_string()));
    }

    #[test]
    fn test_negation_presence() {
        assert!(sig("this is not stable").negation);
        assert!(sig("it can't converge").negation);
        assert!(!sig("this is stable").negation);
    }

    #[test]
    fn test_negation_mismatch_conflicts() {
        let a = sig("the method is stable");
        let b = sig("the method is not stable");
        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
    }

    #[test]
    fn test_increase_decrease_conflict() {
        let a = sig("the error increases with step size");
        let b = sig("the error decreases with step size");
        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
    }

    #[test]
    fn test_max_min_conflict() {
        let a = sig("we maximize the objective");
        let b = sig("we minimize the objective");
        assert!(a.conflicts_with(&b));
    }

    #[test]
    fn test_higher_lower_conflict() {
        assert!(sig("a higher rate").conflicts_with(&sig("a lower rate")));
    }

    #[test]
    fn test_more_fewer_conflict() {
        assert!(sig("more samples").conflicts_with(&sig("fewer samples")));
    }

    #[test]
    fn test_greater_less_conflict() {
        assert!(sig("a greater bound").conflicts_with(&sig("a less strict bound")));
    }

    #[test]
    fn test_always_never_conflict() {
        assert!(sig("this always holds").conflicts_with(&sig("this never holds")));
    }

    #[test]
    fn test_same_polarity_no_conflict() {
        let a = sig("the error decreases quickly");
        let b = sig("the error decreases slowly");
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn test_plain_sentences_no_conflict() {
        assert!(!sig("plain prose").conflicts_with(&sig("plainer prose")));
    }

    #[test]
    fn test_conflict_is_symmetric_across_categories() {
        let pairs = [
            ("values increase here", "values decrease here"),
            ("take the max value", "take the min value"),
            ("always true", "never true"),
        ];
        for (left, right) in pairs {
            assert_eq!(
                sig(left).conflicts_with(&sig(right)),
                sig(right).conflicts_with(&sig(left)),
                "asymmetric for {left:?} / {right:?}"
            );
        }
    }

    #[test]
    fn test_lexicon_roundtrip_json() {
        let json = serde_json::to_string(&PolarityLexicon::builtin()).unwrap();
        let loaded = PolarityLexicon::from_json_str(&json).unwrap();
        assert!(loaded.negation.contains("not"));
        assert_eq!(loaded.version, LEXICON_FORMAT_VERSION);
    }

    #[test]
    fn test_lexicon_rejects_unknown_version() {
        let mut lexicon = PolarityLexicon::builtin();
        lexicon.version = 99;
        let json = serde_json::to_string(&lexicon).unwrap();
        match PolarityLexicon::from_json_str(&json) {
            Err(Error::UnsupportedLexiconVersion(99)) => {}
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn test_lexicon_rejects_empty_category() {
        let mut lexicon = PolarityLexicon::builtin();
        lexicon.higher.clear();
        let json = serde_json::to_string(&lexicon).unwrap();
        match PolarityLexicon::from_json_str(&json) {
            Err(Error::InvalidLexicon(message)) => assert!(message.contains("higher")),
            other => panic!("expected invalid lexicon error, got {other:?}"),
        }
    }

    #[test]
    fn test_lexicon_from_file() {
        use std::io::Write;

        let mut custom = PolarityLexicon::builtin();
        custom.negation.insert("nope".to_string());
        let json = serde_json::to_string(&custom).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = PolarityLexicon::from_path(file.path()).unwrap();
        assert!(loaded.negation.contains("nope"));
    }
}
