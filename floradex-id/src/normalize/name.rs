//! Unit-name canonicalization for cross-source joins
//!
//! Forest unit names arrive from independently sourced lists whose surface
//! text differs in punctuation, diacritics, and decorative glyphs. The
//! normalized form is used only as a join key; displayed names are never
//! rewritten.

use once_cell::sync::Lazy;
use regex::Regex;

/// Decorative glyph some upstream name lists prefix onto unit names
const DECORATIVE_GLYPH: &str = "\u{1f3de}\u{fe0f}";

static NON_ALNUM_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9 ]+").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Canonicalize a unit name into a join key
///
/// Strips the decorative leading glyph, trims, lowercases, treats every run
/// of characters outside `[a-z0-9 ]` as a separator, and collapses
/// whitespace runs to single spaces. Idempotent.
pub fn normalize(name: &str) -> String {
    let stripped = name.replace(DECORATIVE_GLYPH, "");
    let lowered = stripped.trim().to_lowercase();
    let separated = NON_ALNUM_RUN.replace_all(&lowered, " ");
    WHITESPACE_RUN.replace_all(&separated, " ").trim().to_string()
}
