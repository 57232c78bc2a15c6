//! # Normalization Pipeline
//!
//! A 3-stage pipeline for repairing PDF/OCR extraction artifacts in sentence text.
//!
//! ## Pipeline Stages
//!
//! 1. **Stage 1: Unicode Repair** - NFKC normalization, ligature expansion, stray glyph removal
//! 2. **Stage 2: Hyphenation Repair** - Merges line-wrap hyphenation ("af- terposition")
//! 3. **Stage 3: Garbage Strip** - Leader dots, punctuation noise, isolated bullets
//!
//! Every stage is a pure function that is total over its input: malformed or
//! empty text degrades to an empty string instead of failing. The composed
//! pipeline ([`normalize_text_strong`]) is idempotent.

use crate::config::PipelineConfig;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Normalization configuration options
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Enable Stage 1: Unicode repair
    pub repair_unicode: bool,
    /// Enable Stage 2: Hyphenation repair
    pub repair_hyphenation: bool,
    /// Enable Stage 3: Garbage stripping
    pub strip_garbage: bool,
    /// Maximum hyphenation repair passes
    pub hyphen_passes: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            repair_unicode: true,
            repair_hyphenation: true,
            strip_garbage: true,
            hyphen_passes: DEFAULT_HYPHEN_PASSES,
        }
    }
}

impl NormalizeOptions {
    /// Creates options for minimal repair (Unicode canonicalization only)
    pub fn minimal() -> Self {
        Self {
            repair_unicode: true,
            repair_hyphenation: false,
            strip_garbage: false,
            hyphen_passes: DEFAULT_HYPHEN_PASSES,
        }
    }
}

// ============================================================================
// Stage 1: Unicode Repair
// ============================================================================

/// Ligature glyph mapping table: Unicode ligature -> ASCII expansion
const LIGATURE_MAPPINGS: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Directional/arrow glyphs that show up as extraction noise
const ARROW_GLYPHS: &[char] = &[
    '\u{2190}', // ←
    '\u{2192}', // →
    '\u{21D0}', // ⇐
    '\u{21D2}', // ⇒
    '\u{21D4}', // ⇔
    '\u{21B1}',
    '\u{21B2}',
    '\u{21B3}',
    '\u{21B4}',
    '\u{21B5}', // ↵ (also the broken-ligature artifact)
];

/// Unicode replacement character emitted by lossy decoders
const REPLACEMENT_CHAR: char = '\u{FFFD}';

// U+21B5 between two letters is a broken "fi"-style ligature in some PDF
// extractors ("di↵erent"); substitute "f" there rather than deleting.
static RE_BROKEN_LIGATURE_F: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z])\u{21B5}([A-Za-z])").unwrap());

static RE_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Stage 1: Repair Unicode-level extraction damage.
///
/// - NFKC normalization (compatibility composition)
/// - Ligature glyph expansion (ﬀ ﬁ ﬂ ﬃ ﬄ)
/// - Replacement character removal
/// - Broken-ligature arrow between letters -> "f"
/// - Remaining directional/arrow glyph removal
/// - Whitespace collapse and trim
pub fn normalize_unicode_basics(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut text: String = input.nfkc().collect();

    // NFKC already expands most ligatures; the explicit table covers
    // extractors that emit them post-normalization.
    for (ligature, expansion) in LIGATURE_MAPPINGS {
        if text.contains(*ligature) {
            text = text.replace(*ligature, expansion);
        }
    }

    if text.contains(REPLACEMENT_CHAR) {
        text = text.replace(REPLACEMENT_CHAR, "");
    }

    text = RE_BROKEN_LIGATURE_F
        .replace_all(&text, "${1}f${2}")
        .into_owned();

    // Standalone arrows (and any U+21B5 not between letters) are deleted.
    text.retain(|c| !ARROW_GLYPHS.contains(&c));

    collapse_whitespace(&text)
}

/// Collapses whitespace runs to single spaces and trims.
fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

// ============================================================================
// Stage 2: Hyphenation Repair
// ============================================================================

/// Default number of hyphenation repair passes
pub const DEFAULT_HYPHEN_PASSES: usize = 2;

/// Merged words longer than this are assumed to be distinct hyphenated clauses
const MAX_MERGED_WORD_LEN: usize = 25;

static RE_HYPHEN_WRAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]{2,})-\s+([A-Za-z]{2,})").unwrap());

/// Stage 2: Merge line-wrap hyphenation artifacts.
///
/// PDF line wrapping reintroduces a hyphen at a fixed column regardless of
/// morpheme boundaries, so "af- terposition" should become "afterposition".
/// This is a character-class heuristic, not a dictionary lookup. A merge is
/// skipped when either fragment contains a digit, when both fragments start
/// uppercase (compound proper-noun line breaks), or when the merged word
/// would exceed 25 characters.
///
/// Runs up to `max_passes` passes, stopping early once a pass changes nothing.
pub fn repair_hyphenated_linebreaks(input: &str, max_passes: usize) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut text = input.to_string();
    for _ in 0..max_passes {
        let repaired = RE_HYPHEN_WRAP
            .replace_all(&text, |caps: &regex::Captures| {
                merge_wrapped_fragments(&caps[1], &caps[2])
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
        if repaired == text {
            break;
        }
        text = repaired;
    }
    text
}

/// Merges two wrapped word fragments, or returns `None` when a guard applies.
fn merge_wrapped_fragments(left: &str, right: &str) -> Option<String> {
    if left.chars().chain(right.chars()).any(|c| c.is_ascii_digit()) {
        return None;
    }

    let left_upper = left.chars().next().is_some_and(char::is_uppercase);
    let right_upper = right.chars().next().is_some_and(char::is_uppercase);
    if left_upper && right_upper {
        return None;
    }

    let merged = format!("{left}{right}");
    if merged.len() > MAX_MERGED_WORD_LEN {
        return None;
    }
    Some(merged)
}

// ============================================================================
// Stage 3: Garbage Strip
// ============================================================================

static RE_DOT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{3,}").unwrap());

static RE_SEPARATOR_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;]\s*[,;]+").unwrap());

static RE_MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

static RE_BULLET_ONLY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*•\s*$").unwrap());

/// Stage 3: Strip inline punctuation and separator garbage.
///
/// - Runs of three-or-more periods (TOC leader dots, ellipsis noise) -> space
/// - Adjacent comma/semicolon noise -> single comma
/// - Lines that are only an isolated bullet glyph removed
/// - Whitespace runs collapsed, result trimmed
///
/// Idempotent on already-clean input.
pub fn strip_inline_garbage(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let text = RE_DOT_RUN.replace_all(input, " ");
    let text = RE_SEPARATOR_NOISE.replace_all(&text, ",");
    let text = RE_MULTI_SPACE.replace_all(&text, " ");
    let text = RE_BULLET_ONLY_LINE.replace_all(&text, "");
    collapse_whitespace(&text)
}

// ============================================================================
// Composed Pipeline
// ============================================================================

/// Runs the full normalization pipeline: Unicode repair -> hyphenation
/// repair -> garbage strip.
///
/// # Example
///
/// ```
/// use textscrub::normalize_text_strong;
///
/// let repaired = normalize_text_strong("The di\u{21B5}erent af- terposition values");
/// assert_eq!(repaired, "The diferent afterposition values");
/// ```
pub fn normalize_text_strong(input: &str) -> String {
    normalize_with_options(input, &NormalizeOptions::default())
}

/// Runs the normalization pipeline with per-stage switches.
pub fn normalize_with_options(input: &str, options: &NormalizeOptions) -> String {
    let mut text = input.to_string();
    if options.repair_unicode {
        text = normalize_unicode_basics(&text);
    }
    if options.repair_hyphenation {
        text = repair_hyphenated_linebreaks(&text, options.hyphen_passes);
    }
    if options.strip_garbage {
        text = strip_inline_garbage(&text);
    }
    text
}

/// Applies strong normalization when the pipeline configuration enables it.
///
/// Passthrough when `strong_normalize` is off, so callers can keep original
/// casing and punctuation in their output while still deduping.
pub fn normalize_for_study(input: &str, config: &PipelineConfig) -> String {
    if config.strong_normalize {
        normalize_text_strong(input)
    } else {
        input.to_string()
    }
}
