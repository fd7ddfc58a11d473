//! # Utilities
//!
//! Small string helpers shared by the identity normalizer and the outcome
//! classifier, plus a text summary export for calendar pages.

use crate::query::CalendarPage;
use std::fmt::Write as _;

/// Remove every whitespace character from a string.
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Lower-case a string and remove all whitespace.
///
/// This is the canonical token form used for identity matching; applying it
/// twice is a no-op.
pub fn normalize_token(s: &str) -> String {
    strip_whitespace(&s.to_lowercase())
}

/// Strip leading zeros from a registration number.
///
/// An all-zero input normalizes to the literal `"0"` so the result is never
/// empty for a non-empty input.
pub fn strip_leading_zeros(s: &str) -> String {
    let stripped = s.trim_start_matches('0');
    if stripped.is_empty() && !s.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Replace accented Latin characters with their unaccented counterparts.
///
/// Covers the accents that occur in operator-entered outcome labels; anything
/// outside that set passes through unchanged.
pub fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

/// Split a tattoo string into a letter prefix and a digit suffix.
///
/// Returns `None` unless the whole string is letters followed by digits,
/// with at least one of each.
pub fn split_letters_digits(s: &str) -> Option<(&str, &str)> {
    let boundary = s.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = s.split_at(boundary);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((letters, digits))
}

/// Render a calendar page as a plain text summary, one event per line.
pub fn export_to_text_summary(page: &CalendarPage) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Calendar page: {} of {} event(s), offset {}",
        page.events.len(),
        page.total,
        page.offset
    );
    for event in &page.events {
        let _ = writeln!(
            out,
            "{} [{}] {} ({})",
            event.event_date.raw(),
            event.status,
            event.title,
            event.event_type
        );
    }
    out
}
