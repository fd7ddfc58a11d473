//! # Herdcal
//!
//! A reconciliation and forecasting engine for herd reproductive records.
//!
//! Several independently maintained tables — operator-entered calendar
//! rows, receptor acquisition invoices, the pregnancy-diagnosis ledger,
//! embryo-transfer records, and andrological exams — describe the same
//! animals without sharing a reliable foreign key. This crate correlates
//! them through normalized identity tokens, forecasts upcoming events from
//! biological intervals, suppresses forecasts that known outcomes have made
//! moot, deduplicates double-reported facts, and projects the result as a
//! single filtered, ordered, paginated timeline.
//!
//! The engine is a pure read → reconcile → project pipeline: it runs once
//! per request, persists nothing, and mutates no source record. Transport,
//! authentication, and the store itself live outside this crate, which
//! consumes the store through the read-only [`EventSource`] trait.

pub mod adapters;
pub mod dedupe;
pub mod diagnosis;
pub mod forecast;
pub mod identity;
pub mod model;
pub mod query;
pub mod store;
pub mod temporal;
pub mod test_support;
pub mod utils;

// Re-export main types for convenience
pub use diagnosis::DiagnosisIndex;
pub use forecast::{ForecastRules, ServiceMethod};
pub use identity::AnimalKey;
pub use model::{CandidateEvent, EventId, EventOrigin, EventStatus, EventType};
pub use query::{CalendarPage, CalendarQuery};
pub use store::{EventSource, MemorySource};
pub use temporal::{DateRange, EventDate};

use anyhow::Result;
use tracing::warn;

/// Main API for reproductive-event reconciliation.
pub struct Reconciler {
    source: Box<dyn EventSource>,
    rules: ForecastRules,
}

impl Reconciler {
    /// Create a reconciler over a source with the default forecast offsets.
    pub fn new<S>(source: S) -> Self
    where
        S: EventSource + 'static,
    {
        Self::with_rules(source, ForecastRules::default())
    }

    /// Create a reconciler with custom forecast offsets.
    pub fn with_rules<S>(source: S, rules: ForecastRules) -> Self
    where
        S: EventSource + 'static,
    {
        Self {
            source: Box::new(source),
            rules,
        }
    }

    pub fn rules(&self) -> &ForecastRules {
        &self.rules
    }

    /// Build the reconciled calendar for one request.
    ///
    /// The diagnosis index is built first so every suppression decision
    /// reads a complete, immutable snapshot. Each adapter then contributes
    /// independently: a failed source degrades to an empty contribution
    /// and a log entry, and only when every backing query failed does the
    /// request itself fail — partial data is acceptable, fabricated
    /// forecasts are not.
    pub fn calendar(&self, query: &CalendarQuery) -> Result<CalendarPage> {
        let source = self.source.as_ref();

        let diagnoses = match DiagnosisIndex::build(source) {
            Ok(index) => Some(index),
            Err(err) => {
                warn!(error = %err, "diagnosis ledger scan failed, forecasts will be withheld");
                None
            }
        };

        let mut failures = 0usize;
        let mut events = Vec::new();

        let mut fold = |label: &str, outcome: Result<Vec<CandidateEvent>>| match outcome {
            Ok(batch) => events.extend(batch),
            Err(err) => {
                warn!(adapter = label, error = %err, "source unavailable, contributing nothing");
                failures += 1;
            }
        };

        fold("manual", adapters::manual_events(source));
        fold(
            "receptor",
            adapters::receptor_lifecycle(source, &self.rules, diagnoses.as_ref()),
        );
        fold(
            "andrological",
            adapters::andrological_retests(source, &self.rules),
        );
        fold(
            "gestation",
            adapters::birth_forecasts(source, &self.rules, diagnoses.as_ref()),
        );

        if failures == 4 {
            anyhow::bail!("reproductive calendar unavailable: every source query failed");
        }

        // Manual and receptor ids live in disjoint namespaces and the
        // andrological adapter already collapsed its own re-derivations,
        // so no further global dedup pass is applied here.
        Ok(query::project(events, query))
    }

    /// Birth forecasts alone, from the gestation records.
    pub fn birth_forecasts(&self) -> Result<Vec<CandidateEvent>> {
        let source = self.source.as_ref();
        let diagnoses = match DiagnosisIndex::build(source) {
            Ok(index) => Some(index),
            Err(err) => {
                warn!(error = %err, "diagnosis ledger scan failed, forecasts will be withheld");
                None
            }
        };
        adapters::birth_forecasts(source, &self.rules, diagnoses.as_ref())
    }
}
