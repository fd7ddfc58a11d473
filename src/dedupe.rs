//! # Dedupe Module
//!
//! Collapses candidate events that describe the same underlying fact:
//! same animal token (or fallback id), same date, same event type. The
//! first occurrence wins.

use crate::model::{CandidateEvent, EventType};
use rustc_hash::FxHashSet;

/// Drop later events that repeat an already-seen
/// `(animal token, date, event type)` fact.
pub fn dedupe_events(events: Vec<CandidateEvent>) -> Vec<CandidateEvent> {
    let mut seen: FxHashSet<(String, String, EventType)> = FxHashSet::default();
    let mut result = Vec::with_capacity(events.len());

    for event in events {
        let key = (
            event.fact_token().to_string(),
            event.event_date.raw().to_string(),
            event.event_type,
        );
        if seen.insert(key) {
            result.push(event);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AnimalKey;
    use crate::model::{EventId, EventOrigin, EventStatus};
    use crate::temporal::EventDate;
    use std::collections::HashMap;
    use time::macros::date;

    fn retest(id: &str, tattoo: &str, day: u8) -> CandidateEvent {
        CandidateEvent {
            id: EventId(id.to_string()),
            title: format!("Re-test {}", tattoo),
            animal_id: None,
            animal_key: Some(AnimalKey::from_tattoo(tattoo)),
            event_date: EventDate::from_date(date!(2024 - 02 - 01).replace_day(day).unwrap()),
            event_type: EventType::Retest,
            description: String::new(),
            status: EventStatus::Scheduled,
            origin: EventOrigin::Andrological,
            extra: HashMap::new(),
        }
    }

    #[test]
    fn test_same_fact_collapses_keeping_first() {
        let events = vec![retest("a", "RPT1", 9), retest("b", "RPT1", 9)];
        let deduped = dedupe_events(events);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].id.0, "a");
    }

    #[test]
    fn test_different_dates_survive() {
        let events = vec![retest("a", "RPT1", 9), retest("b", "RPT1", 10)];
        assert_eq!(dedupe_events(events).len(), 2);
    }

    #[test]
    fn test_different_animals_survive() {
        let events = vec![retest("a", "RPT1", 9), retest("b", "RPT2", 9)];
        assert_eq!(dedupe_events(events).len(), 2);
    }

    #[test]
    fn test_keyless_events_fall_back_to_id() {
        let mut a = retest("a", "RPT1", 9);
        a.animal_key = None;
        let mut b = retest("b", "RPT1", 9);
        b.animal_key = None;
        // Distinct ids, so neither is dropped.
        assert_eq!(dedupe_events(vec![a, b]).len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let events = vec![retest("a", "RPT1", 9), retest("b", "RPT1", 9)];
        let once = dedupe_events(events);
        let twice = dedupe_events(once.clone());
        assert_eq!(once, twice);
    }
}
