//! Math-density classification for equation-heavy sentences.
//!
//! Scores the fraction of "mathy" tokens in a sentence (digits, operator
//! characters, Greek letters, LaTeX escapes). The score is a signal only:
//! it feeds the dedupe cleanliness heuristic and downstream filtering, and
//! never blocks processing.

use regex::Regex;
use std::sync::LazyLock;

/// Default density cutoff for [`is_math_heavy`]
pub const DEFAULT_MATH_HEAVY_THRESHOLD: f64 = 0.30;

/// Operator and bracket characters counted as math
const MATH_OPERATORS: &[char] = &[
    '=', '<', '>', '±', '×', '÷', '∑', '∫', '√', '^', '_', '{', '}', '[', ']', '(', ')',
];

/// Greek letters common in extracted equations
const GREEK_LETTERS: &[char] = &[
    'α', 'β', 'γ', 'δ', 'λ', 'μ', 'σ', 'π', 'θ', 'ω', 'Δ', 'Σ', 'Π', 'Λ', 'Γ',
];

static RE_LATEX_ESCAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\[a-zA-Z]").unwrap());

// Equation labels like "(9.14)"
static RE_EQUATION_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\d+\.\d+\)").unwrap());

/// Returns true for a whitespace-delimited token with math characteristics.
fn is_mathy_token(token: &str) -> bool {
    if token.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    if token.chars().any(|c| MATH_OPERATORS.contains(&c)) {
        return true;
    }
    if token.chars().any(|c| GREEK_LETTERS.contains(&c)) {
        return true;
    }
    token.contains('\\') && RE_LATEX_ESCAPE.is_match(token)
}

/// Returns the fraction of mathy tokens in `text`, in `[0, 1]`.
///
/// Empty input scores 0.0.
pub fn math_density(text: &str) -> f64 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let mathy = tokens.iter().filter(|t| is_mathy_token(t)).count();
    mathy as f64 / tokens.len() as f64
}

/// Returns true when a sentence is equation-heavy.
///
/// A sentence qualifies when its [`math_density`] reaches `threshold`, when
/// it contains more than two operator characters in total, or when it
/// carries an equation label like `(9.14)` alongside at least one operator.
pub fn is_math_heavy(text: &str, threshold: f64) -> bool {
    if text.is_empty() {
        return false;
    }
    if math_density(text) >= threshold {
        return true;
    }
    let operator_count = text.chars().filter(|c| MATH_OPERATORS.contains(c)).count();
    if operator_count > 2 {
        return true;
    }
    operator_count >= 1 && RE_EQUATION_LABEL.is_match(text)
}

/// Drops equation-heavy sentences from a batch.
///
/// Convenience for artifact-generation callers that want prose only.
pub fn filter_math_heavy(sentences: &[String], threshold: f64) -> Vec<String> {
    sentences
        .iter()
        .filter(|s| !is_math_heavy(s, threshold))
        .cloned()
        .collect()
}
