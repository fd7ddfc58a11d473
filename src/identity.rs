//! # Identity Module
//!
//! Normalizes an animal's identity fragments (breed code, registration
//! number, tattoo) into matching tokens. The source tables were never given
//! a shared foreign key and are inconsistent about zero-padding and about
//! whether the breed code is repeated inside the tattoo field, so matching
//! is defined as token-set intersection over every derivable token rather
//! than single-field equality.

use crate::utils::{normalize_token, split_letters_digits, strip_leading_zeros};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized animal identity.
///
/// Value object, recomputed per lookup, never persisted. `composite` is
/// always computed — possibly to the empty string — so set lookups never
/// branch on nullability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimalKey {
    /// Breed code fragment, normalized, when present.
    pub breed_code: Option<String>,
    /// Registration number as entered, normalized, when present.
    pub number: Option<String>,
    /// Registration number with leading zeros stripped (`"000"` becomes `"0"`).
    pub number_unpadded: Option<String>,
    /// Tattoo string, lower-cased and whitespace-free, when present.
    pub tattoo: Option<String>,
    /// Primary matching token: breed code and number concatenated,
    /// lower-cased, whitespace-free.
    pub composite: String,
}

impl AnimalKey {
    /// Normalize identity fragments into a key.
    pub fn normalize(
        breed_code: Option<&str>,
        number: Option<&str>,
        tattoo: Option<&str>,
    ) -> Self {
        let breed_code = breed_code.map(normalize_token).filter(|s| !s.is_empty());
        let number = number.map(normalize_token).filter(|s| !s.is_empty());
        let number_unpadded = number.as_deref().map(strip_leading_zeros);
        let tattoo = tattoo.map(normalize_token).filter(|s| !s.is_empty());

        let composite = format!(
            "{}{}",
            breed_code.as_deref().unwrap_or(""),
            number.as_deref().unwrap_or("")
        );

        Self {
            breed_code,
            number,
            number_unpadded,
            tattoo,
            composite,
        }
    }

    /// Derive a key from a tattoo string alone.
    ///
    /// A tattoo of the shape letters-then-digits (`RPT1234`) splits into a
    /// breed code and a number, which also makes the composite and unpadded
    /// tokens available; any other shape is carried as a tattoo token only.
    pub fn from_tattoo(tattoo: &str) -> Self {
        let cleaned = normalize_token(tattoo);
        match split_letters_digits(&cleaned) {
            Some((letters, digits)) => Self::normalize(Some(letters), Some(digits), Some(tattoo)),
            None => Self::normalize(None, None, Some(tattoo)),
        }
    }

    /// Whether no token at all could be derived.
    pub fn is_empty(&self) -> bool {
        self.composite.is_empty() && self.tattoo.is_none() && self.number_unpadded.is_none()
    }

    /// Every matching token this key can be looked up by.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens = Vec::with_capacity(3);
        if !self.composite.is_empty() {
            tokens.push(self.composite.as_str());
        }
        if let Some(number) = self.number_unpadded.as_deref() {
            tokens.push(number);
        }
        if let Some(tattoo) = self.tattoo.as_deref() {
            tokens.push(tattoo);
        }
        tokens
    }

    /// The matching predicate: two keys refer to the same animal when their
    /// composites match, their unpadded numbers match, or their tattoos
    /// match, with empty tokens never matching anything.
    pub fn matches(&self, other: &AnimalKey) -> bool {
        if !self.composite.is_empty() && self.composite == other.composite {
            return true;
        }
        if let (Some(a), Some(b)) = (self.number_unpadded.as_deref(), other.number_unpadded.as_deref()) {
            if a == b {
                return true;
            }
        }
        if let (Some(a), Some(b)) = (self.tattoo.as_deref(), other.tattoo.as_deref()) {
            if a == b {
                return true;
            }
        }
        false
    }
}

impl fmt::Display for AnimalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tattoo) = self.tattoo.as_deref() {
            write!(f, "{}", tattoo)
        } else if !self.composite.is_empty() {
            write!(f, "{}", self.composite)
        } else {
            write!(f, "?")
        }
    }
}
