//! # Data Model
//!
//! Core data structures for the reconciled reproductive calendar: event
//! identifiers, classification enums, and the candidate event that every
//! source adapter emits.

use crate::identity::AnimalKey;
use crate::temporal::EventDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Deterministic synthetic identifier for a candidate event.
///
/// Derived from the origin, the source row id, and a per-origin suffix, so
/// repeated requests produce stable ids and re-derivations of the same
/// underlying fact carry the same id across calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    /// Derive an id from origin, source row id, and suffix.
    pub fn derived(origin: EventOrigin, row: impl fmt::Display, suffix: &str) -> Self {
        Self(format!("{}-{}-{}", origin, row, suffix))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    /// A receptor animal arrived on the farm.
    Arrival,
    /// A pregnancy diagnosis is due.
    DiagnosisDue,
    /// A birth is forecast.
    BirthDue,
    /// An andrological re-test is due.
    Retest,
    /// Operator-entered entry with no specific classification.
    General,
}

impl EventType {
    /// Map an operator-entered type label onto a classification.
    /// Unrecognized labels fall back to [`EventType::General`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "arrival" => Self::Arrival,
            "diagnosis" | "diagnosis-due" => Self::DiagnosisDue,
            "birth" | "birth-due" => Self::BirthDue,
            "retest" => Self::Retest,
            _ => Self::General,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Arrival => "arrival",
            Self::DiagnosisDue => "diagnosis-due",
            Self::BirthDue => "birth-due",
            Self::Retest => "retest",
            Self::General => "general",
        };
        write!(f, "{}", label)
    }
}

/// Whether an event already happened or is forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Done,
}

impl EventStatus {
    /// Map an operator-entered status label; anything not recognizably
    /// completed counts as scheduled.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "done" | "completed" | "closed" => Self::Done,
            _ => Self::Scheduled,
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Which source adapter produced an event. Also the id namespace prefix,
/// which is what keeps ids from different origins disjoint by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOrigin {
    Manual,
    Receptor,
    Andrological,
    Gestation,
}

impl fmt::Display for EventOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Manual => "manual",
            Self::Receptor => "receptor",
            Self::Andrological => "andrological",
            Self::Gestation => "gestation",
        };
        write!(f, "{}", label)
    }
}

/// One reconciled calendar entry, factual or forecast, prior to filtering
/// and pagination.
///
/// Constructed fresh per request and discarded with the response; nothing
/// here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub id: EventId,
    pub title: String,
    /// Store-level animal id, when the source row carries one.
    pub animal_id: Option<i64>,
    /// Normalized identity, when one could be derived.
    pub animal_key: Option<AnimalKey>,
    pub event_date: EventDate,
    pub event_type: EventType,
    pub description: String,
    pub status: EventStatus,
    pub origin: EventOrigin,
    /// Origin-specific extras (supplier, invoice number, exam outcome…)
    /// passed through for response shaping.
    pub extra: HashMap<String, String>,
}

impl CandidateEvent {
    /// The token used to recognize two events as the same underlying fact:
    /// the composite key when derivable, else the tattoo, else the event id
    /// (which makes the event only ever equal to itself).
    pub fn fact_token(&self) -> &str {
        if let Some(key) = &self.animal_key {
            if !key.composite.is_empty() {
                return &key.composite;
            }
            if let Some(tattoo) = key.tattoo.as_deref() {
                return tattoo;
            }
        }
        &self.id.0
    }
}
