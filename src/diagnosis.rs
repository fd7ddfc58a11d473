//! # Diagnosis Module
//!
//! The status resolver: a read-only index over the diagnosis ledger that
//! answers "has this animal been diagnosed at all?" and "was it diagnosed
//! negative/empty?". Built in one pass per request, before any adapter
//! that suppresses forecasts with it runs, and immutable afterwards.

use crate::identity::AnimalKey;
use crate::store::EventSource;
use crate::utils::fold_accents;
use anyhow::Result;
use hashbrown::HashSet;

/// Classify a diagnosis outcome label as negative/empty.
///
/// The ledger stores free text, so classification is a small vocabulary
/// match — "negative", "empty", or the bare word "no" — applied after
/// accent folding and lower-casing. This is the single definition used by
/// every suppression decision.
pub fn is_negative_outcome(outcome: &str) -> bool {
    let folded = fold_accents(outcome).to_lowercase();
    let folded = folded.trim();
    folded == "no" || folded.contains("negative") || folded.contains("empty")
}

/// Token index over every diagnosed animal.
///
/// Every derivable token of a diagnosed animal (composite key, unpadded
/// number, tattoo) is inserted, so a later lookup matches whichever
/// representation the other table happened to use.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisIndex {
    diagnosed: HashSet<String>,
    negative: HashSet<String>,
}

impl DiagnosisIndex {
    /// An index with no diagnoses (nothing gets suppressed).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan the diagnosis ledger and the embryo-transfer outcomes.
    pub fn build(source: &dyn EventSource) -> Result<Self> {
        let mut index = Self::default();

        for row in source.diagnosis_records()? {
            let key = AnimalKey::normalize(
                row.breed_code.as_deref(),
                row.number.as_deref(),
                row.tattoo.as_deref(),
            );
            index.insert(&key, is_negative_outcome(&row.outcome));
        }

        for row in source.embryo_transfers()? {
            let Some(outcome) = row.outcome.as_deref() else {
                continue;
            };
            if outcome.trim().is_empty() {
                continue;
            }
            let key = AnimalKey::normalize(
                row.receptor_breed_code.as_deref(),
                row.receptor_number.as_deref(),
                row.receptor_tattoo.as_deref(),
            );
            index.insert(&key, is_negative_outcome(outcome));
        }

        Ok(index)
    }

    fn insert(&mut self, key: &AnimalKey, negative: bool) {
        for token in key.tokens() {
            self.diagnosed.insert(token.to_string());
            if negative {
                self.negative.insert(token.to_string());
            }
        }
    }

    /// Whether any diagnosis, positive or negative, is on record for the
    /// animal. A hit on any of the key's tokens is a hit.
    pub fn has_diagnosis(&self, key: &AnimalKey) -> bool {
        key.tokens().iter().any(|t| self.diagnosed.contains(*t))
    }

    /// Whether a negative/empty diagnosis is on record for the animal.
    pub fn is_negative(&self, key: &AnimalKey) -> bool {
        key.tokens().iter().any(|t| self.negative.contains(*t))
    }

    /// Number of distinct tokens with any diagnosis.
    pub fn len(&self) -> usize {
        self.diagnosed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnosed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DiagnosisRow, EmbryoTransferRow, MemorySource};

    #[test]
    fn test_negative_vocabulary() {
        assert!(is_negative_outcome("negative"));
        assert!(is_negative_outcome("NEGATIVE"));
        assert!(is_negative_outcome("Négative"));
        assert!(is_negative_outcome("empty"));
        assert!(is_negative_outcome("diagnosed empty"));
        assert!(is_negative_outcome("no"));
        assert!(is_negative_outcome(" NO "));

        assert!(!is_negative_outcome("positive"));
        assert!(!is_negative_outcome("normal"));
        assert!(!is_negative_outcome(""));
        assert!(!is_negative_outcome("pending"));
    }

    #[test]
    fn test_index_matches_any_token_form() {
        let mut source = MemorySource::new();
        source.push_diagnosis(DiagnosisRow {
            breed_code: Some("RPT".to_string()),
            number: Some("007".to_string()),
            tattoo: Some("RPT007".to_string()),
            outcome: "negative".to_string(),
            ..Default::default()
        });

        let index = DiagnosisIndex::build(&source).unwrap();

        // Composite form, padded as entered.
        let padded = AnimalKey::normalize(Some("RPT"), Some("007"), None);
        assert!(index.has_diagnosis(&padded));
        assert!(index.is_negative(&padded));

        // Unpadded number form.
        let unpadded = AnimalKey::normalize(None, Some("7"), None);
        assert!(index.has_diagnosis(&unpadded));
        assert!(index.is_negative(&unpadded));

        // Tattoo form.
        let tattoo = AnimalKey::normalize(None, None, Some("rpt 007"));
        assert!(index.has_diagnosis(&tattoo));

        // Unrelated animal.
        let other = AnimalKey::normalize(Some("RPT"), Some("8"), None);
        assert!(!index.has_diagnosis(&other));
        assert!(!index.is_negative(&other));
    }

    #[test]
    fn test_positive_diagnosis_is_not_negative() {
        let mut source = MemorySource::new();
        source.push_diagnosis(DiagnosisRow {
            tattoo: Some("RPT12".to_string()),
            outcome: "positive".to_string(),
            ..Default::default()
        });

        let index = DiagnosisIndex::build(&source).unwrap();
        let key = AnimalKey::from_tattoo("RPT12");
        assert!(index.has_diagnosis(&key));
        assert!(!index.is_negative(&key));
    }

    #[test]
    fn test_embryo_transfer_outcomes_contribute() {
        let mut source = MemorySource::new();
        source.push_transfer(EmbryoTransferRow {
            receptor_tattoo: Some("RPT55".to_string()),
            outcome: Some("empty".to_string()),
            ..Default::default()
        });
        // A transfer with no outcome says nothing about diagnosis.
        source.push_transfer(EmbryoTransferRow {
            receptor_tattoo: Some("RPT56".to_string()),
            outcome: None,
            ..Default::default()
        });

        let index = DiagnosisIndex::build(&source).unwrap();
        assert!(index.is_negative(&AnimalKey::from_tattoo("RPT55")));
        assert!(!index.has_diagnosis(&AnimalKey::from_tattoo("RPT56")));
    }

    #[test]
    fn test_empty_index() {
        let index = DiagnosisIndex::empty();
        assert!(index.is_empty());
        assert!(!index.has_diagnosis(&AnimalKey::from_tattoo("RPT1")));
    }
}
