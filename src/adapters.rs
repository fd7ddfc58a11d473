//! # Source Adapters
//!
//! One adapter per record origin, each reading its backing table through
//! [`EventSource`] and yielding candidate events in the common shape.
//! Adapters return `Result` so the aggregator can fold a failed source
//! into an empty contribution; malformed rows are dropped individually
//! with a log entry and never abort the batch.
//!
//! Forecast-emitting adapters take the diagnosis index as
//! `Option<&DiagnosisIndex>`: `None` means the ledger scan itself failed,
//! in which case the dependent forecasts are withheld rather than emitted
//! unsuppressed.

use crate::dedupe::dedupe_events;
use crate::diagnosis::DiagnosisIndex;
use crate::forecast::{ForecastRules, ServiceMethod};
use crate::identity::AnimalKey;
use crate::model::{CandidateEvent, EventId, EventOrigin, EventStatus, EventType};
use crate::store::{EventSource, ReceptorInvoiceRow};
use crate::temporal::{self, EventDate};
use crate::utils::fold_accents;
use anyhow::Result;
use rustc_hash::FxHashSet;
use std::collections::HashMap;
use time::Date;
use tracing::{debug, warn};

/// Operator-entered calendar rows, passed through unchanged except for
/// date normalization. These are ground truth: no forecasting, no
/// suppression. A row whose date field is blank has no anchor and is
/// dropped; a present but unparseable date is kept and sorts last.
pub fn manual_events(source: &dyn EventSource) -> Result<Vec<CandidateEvent>> {
    let rows = source.manual_events()?;
    let mut events = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(event_date) = EventDate::parse(&row.event_date) else {
            warn!(row = row.id, "manual calendar row without a date, dropped");
            continue;
        };
        events.push(CandidateEvent {
            id: EventId::derived(EventOrigin::Manual, row.id, "entry"),
            title: row.title,
            animal_id: row.animal_id,
            animal_key: None,
            event_date,
            event_type: EventType::from_label(&row.event_type),
            description: row.description,
            status: EventStatus::from_label(&row.status),
            origin: EventOrigin::Manual,
            extra: HashMap::new(),
        });
    }

    debug!(count = events.len(), "manual events collected");
    Ok(events)
}

/// Identity for a receptor invoice line: preferentially the tattoo field
/// (split into breed letters and number digits when it has that shape),
/// falling back to the invoice's own receptor letter/number columns.
/// Also returns a display label for event titles.
fn receptor_identity(row: &ReceptorInvoiceRow) -> (AnimalKey, String) {
    if let Some(tattoo) = row.tattoo.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return (AnimalKey::from_tattoo(tattoo), tattoo.to_string());
    }
    let letter = row.receptor_letter.as_deref().unwrap_or("").trim();
    let number = row.receptor_number.as_deref().unwrap_or("").trim();
    let key = AnimalKey::normalize(
        row.receptor_letter.as_deref(),
        row.receptor_number.as_deref(),
        None,
    );
    (key, format!("{} {}", letter, number).trim().to_string())
}

/// Derive the receptor lifecycle from acquisition invoice lines: an
/// arrival fact, a diagnosis reminder twenty days out unless a diagnosis
/// is already on record, and a predicted birth nine calendar months after
/// the recorded embryo transfer unless the animal was diagnosed empty.
///
/// Two lines resolving to the same `(invoice, item)` pair are one
/// receptor instance and emit once.
pub fn receptor_lifecycle(
    source: &dyn EventSource,
    rules: &ForecastRules,
    diagnoses: Option<&DiagnosisIndex>,
) -> Result<Vec<CandidateEvent>> {
    let rows = source.receptor_invoices()?;
    let mut seen: FxHashSet<(i64, i64)> = FxHashSet::default();
    let mut events = Vec::new();

    for row in rows {
        if !seen.insert((row.invoice_id, row.item_id)) {
            continue;
        }
        let (key, label) = receptor_identity(&row);
        let row_ref = format!("{}-{}", row.invoice_id, row.item_id);

        let mut extra = HashMap::new();
        if !row.supplier.is_empty() {
            extra.insert("supplier".to_string(), row.supplier.clone());
        }
        if !row.invoice_number.is_empty() {
            extra.insert("invoice-number".to_string(), row.invoice_number.clone());
        }

        let arrival = match row.arrival_date.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                let parsed = temporal::parse_date(raw);
                if parsed.is_none() {
                    warn!(invoice = row.invoice_id, item = row.item_id, date = raw,
                        "unparseable arrival date on receptor invoice, dropped");
                }
                parsed
            }
            _ => None,
        };

        if let Some(arrival) = arrival {
            events.push(CandidateEvent {
                id: EventId::derived(EventOrigin::Receptor, &row_ref, "arrival"),
                title: format!("Receptor arrival {}", label),
                animal_id: None,
                animal_key: Some(key.clone()),
                event_date: EventDate::from_date(arrival),
                event_type: EventType::Arrival,
                description: format!("Receptor {} received", label),
                status: EventStatus::Done,
                origin: EventOrigin::Receptor,
                extra: extra.clone(),
            });
        }

        let Some(index) = diagnoses else {
            continue;
        };

        if !index.has_diagnosis(&key) {
            if let Some(due) = arrival.and_then(|d| rules.diagnosis_due(d)) {
                events.push(CandidateEvent {
                    id: EventId::derived(EventOrigin::Receptor, &row_ref, "diagnosis"),
                    title: format!("Pregnancy diagnosis due {}", label),
                    animal_id: None,
                    animal_key: Some(key.clone()),
                    event_date: EventDate::from_date(due),
                    event_type: EventType::DiagnosisDue,
                    description: format!("Diagnosis of receptor {} pending", label),
                    status: EventStatus::Scheduled,
                    origin: EventOrigin::Receptor,
                    extra: extra.clone(),
                });
            }
        }

        if !index.is_negative(&key) {
            let transfer = row
                .transfer_date
                .as_deref()
                .and_then(temporal::parse_date);
            if let Some(due) = transfer.and_then(|d| rules.receptor_birth_due(d)) {
                events.push(CandidateEvent {
                    id: EventId::derived(EventOrigin::Receptor, &row_ref, "birth"),
                    title: format!("Predicted birth {}", label),
                    animal_id: None,
                    animal_key: Some(key.clone()),
                    event_date: EventDate::from_date(due),
                    event_type: EventType::BirthDue,
                    description: format!("Birth forecast for receptor {}", label),
                    status: EventStatus::Scheduled,
                    origin: EventOrigin::Receptor,
                    extra,
                });
            }
        }
    }

    debug!(count = events.len(), "receptor lifecycle events collected");
    Ok(events)
}

/// Anchor rule for an andrological re-test, which differs by exam state:
/// an unfit exam forecasts thirty days out (or uses an explicit reschedule
/// override), while a pending exam already flagged as rescheduled *is* the
/// re-test and uses its own exam date.
fn retest_anchor(
    rules: &ForecastRules,
    outcome: &str,
    rescheduled: bool,
    exam_date: Option<Date>,
    reschedule_date: Option<Date>,
) -> Option<Date> {
    match outcome {
        "unfit" => reschedule_date.or_else(|| exam_date.and_then(|d| rules.retest_due(d))),
        "pending" if rescheduled => exam_date,
        _ => None,
    }
}

/// Re-test reminders from andrological exam records. The unfit state and
/// the pending-rescheduled state can both describe the same underlying
/// re-test, so the adapter dedupes on `(animal, date)` before its output
/// reaches the merge.
pub fn andrological_retests(
    source: &dyn EventSource,
    rules: &ForecastRules,
) -> Result<Vec<CandidateEvent>> {
    let rows = source.andrological_exams()?;
    let mut events = Vec::new();

    for row in rows {
        let outcome = fold_accents(&row.outcome).to_lowercase();
        let exam_date = temporal::parse_date(&row.exam_date);
        let reschedule_date = row
            .reschedule_date
            .as_deref()
            .and_then(temporal::parse_date);

        let Some(due) = retest_anchor(
            rules,
            outcome.trim(),
            row.rescheduled,
            exam_date,
            reschedule_date,
        ) else {
            if outcome.trim() == "unfit" {
                warn!(exam = row.exam_id, "unfit exam without a computable re-test date, dropped");
            }
            continue;
        };

        let key = AnimalKey::normalize(row.breed_code.as_deref(), row.number.as_deref(), None);
        let label = if row.animal_name.trim().is_empty() {
            key.to_string()
        } else {
            row.animal_name.trim().to_string()
        };
        let mut extra = HashMap::new();
        extra.insert("outcome".to_string(), row.outcome.clone());

        events.push(CandidateEvent {
            id: EventId::derived(EventOrigin::Andrological, row.exam_id, "retest"),
            title: format!("Andrological re-test {}", label),
            animal_id: None,
            animal_key: Some(key),
            event_date: EventDate::from_date(due),
            event_type: EventType::Retest,
            description: format!("Re-test of {} after {} exam", label, outcome.trim()),
            status: EventStatus::Scheduled,
            origin: EventOrigin::Andrological,
            extra,
        });
    }

    let events = dedupe_events(events);
    debug!(count = events.len(), "andrological re-test events collected");
    Ok(events)
}

/// Birth forecasts from gestation records, one per service, with the
/// gestation length picked per service method. A gestation whose animal
/// was diagnosed empty is suppressed outright.
pub fn birth_forecasts(
    source: &dyn EventSource,
    rules: &ForecastRules,
    diagnoses: Option<&DiagnosisIndex>,
) -> Result<Vec<CandidateEvent>> {
    let rows = source.gestations()?;
    let Some(index) = diagnoses else {
        warn!("diagnosis ledger unavailable, gestation birth forecasts withheld");
        return Ok(Vec::new());
    };
    let mut events = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(service) = temporal::parse_date(&row.service_date) else {
            warn!(gestation = row.id, "gestation row without a service date, dropped");
            continue;
        };
        let method = ServiceMethod::from_label(&row.service_method);
        let Some(due) = rules.birth_due(method, service) else {
            continue;
        };

        let key = AnimalKey::normalize(row.breed_code.as_deref(), row.number.as_deref(), None);
        if index.is_negative(&key) {
            continue;
        }
        let label = if row.animal_name.trim().is_empty() {
            key.to_string()
        } else {
            row.animal_name.trim().to_string()
        };
        let mut extra = HashMap::new();
        extra.insert("service-method".to_string(), row.service_method.clone());

        events.push(CandidateEvent {
            id: EventId::derived(EventOrigin::Gestation, row.id, "birth"),
            title: format!("Predicted birth {}", label),
            animal_id: None,
            animal_key: Some(key),
            event_date: EventDate::from_date(due),
            event_type: EventType::BirthDue,
            description: format!("Birth forecast for {}", label),
            status: EventStatus::Scheduled,
            origin: EventOrigin::Gestation,
            extra,
        });
    }

    debug!(count = events.len(), "gestation birth forecasts collected");
    Ok(events)
}
