//! # Query Module
//!
//! The projection step: caller-supplied filtering, total descending-date
//! ordering, and offset/limit pagination over the merged candidate list.

use crate::model::{CandidateEvent, EventType};
use crate::temporal::{self, DateRange};
use crate::utils::normalize_token;
use serde::{Deserialize, Serialize};

/// Caller filters for one calendar request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarQuery {
    /// Inclusive event-date window.
    pub range: DateRange,
    /// Restrict to a single event classification.
    pub event_type: Option<EventType>,
    /// Free-text animal match against title, description, and identity
    /// tokens (breed/number/tattoo substring).
    pub animal_search: Option<String>,
    pub offset: usize,
    pub limit: Option<usize>,
}

/// One page of the reconciled calendar, with the pre-pagination total the
/// paging UI needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarPage {
    pub events: Vec<CandidateEvent>,
    pub total: usize,
    pub offset: usize,
}

fn matches_search(event: &CandidateEvent, needle: &str) -> bool {
    if event.title.to_lowercase().contains(needle) {
        return true;
    }
    if event.description.to_lowercase().contains(needle) {
        return true;
    }
    if let Some(key) = &event.animal_key {
        let token = normalize_token(needle);
        if !token.is_empty() && key.tokens().iter().any(|t| t.contains(token.as_str())) {
            return true;
        }
    }
    false
}

/// Filter, sort, and paginate the merged event list.
///
/// Ordering is descending by event date; an event whose date did not parse
/// sorts after every dated event, and ties break on the event id so
/// repeated requests page identically.
pub fn project(events: Vec<CandidateEvent>, query: &CalendarQuery) -> CalendarPage {
    let needle = query
        .animal_search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut filtered: Vec<CandidateEvent> = events
        .into_iter()
        .filter(|e| query.range.contains(e.event_date.date()))
        .filter(|e| query.event_type.map_or(true, |t| e.event_type == t))
        .filter(|e| needle.as_deref().map_or(true, |n| matches_search(e, n)))
        .collect();

    filtered.sort_by(|a, b| {
        temporal::cmp_desc(&a.event_date, &b.event_date).then_with(|| a.id.cmp(&b.id))
    });

    let total = filtered.len();
    let events: Vec<CandidateEvent> = filtered
        .into_iter()
        .skip(query.offset)
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();

    CalendarPage {
        events,
        total,
        offset: query.offset,
    }
}
