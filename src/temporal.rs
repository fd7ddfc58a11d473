//! # Temporal Module
//!
//! Calendar-date handling for reconciliation: flexible parsing of
//! operator-entered date strings, forecast arithmetic (day offsets and
//! end-of-month-clamped month offsets), and a total descending ordering
//! that tolerates unparseable dates.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use time::macros::format_description;
use time::{Date, Duration, Month};

/// Parse a date from the representations the source tables actually contain.
///
/// Accepts ISO `YYYY-MM-DD`, day-first `DD/MM/YYYY`, and datetime strings
/// whose date part matches either form (the time-of-day is discarded).
/// Returns `None` for anything else.
pub fn parse_date(raw: &str) -> Option<Date> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let s = match s.split_once(|c| c == 'T' || c == ' ') {
        Some((date_part, _)) => date_part,
        None => s,
    };

    let iso = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(s, &iso) {
        return Some(date);
    }
    let day_first = format_description!("[day]/[month]/[year]");
    if let Ok(date) = Date::parse(s, &day_first) {
        return Some(date);
    }
    None
}

/// Add a whole number of days to a date.
pub fn add_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(Duration::days(days))
}

/// Add calendar months to a date, clamping the day to the target month's end.
///
/// `2024-05-31 + 9` is `2025-02-28`: the month advances exactly `months`
/// steps and a day past the end of the target month is pulled back to it.
pub fn add_months(date: Date, months: u32) -> Option<Date> {
    let zero_based = i64::from(u8::from(date.month())) - 1 + i64::from(months);
    let year = i32::try_from(i64::from(date.year()) + zero_based.div_euclid(12)).ok()?;
    let month = Month::try_from((zero_based.rem_euclid(12) + 1) as u8).ok()?;
    let day = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).ok()
}

/// An event date as it travels through the pipeline: the raw string from the
/// source row plus the parsed calendar date when parsing succeeded.
///
/// Forecast adapters always construct these from computed dates, so their
/// parsed side is always present; manually entered rows can carry a present
/// but unparseable string, which sorts after every parseable date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDate {
    raw: String,
    parsed: Option<Date>,
}

impl EventDate {
    /// Build from a raw source string. Returns `None` when the string is
    /// empty or whitespace (a null anchor), so callers drop the row instead
    /// of emitting a dateless event.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_string(),
            parsed: parse_date(trimmed),
        })
    }

    /// Build from an already-computed calendar date.
    pub fn from_date(date: Date) -> Self {
        Self {
            raw: format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            ),
            parsed: Some(date),
        }
    }

    /// The parsed calendar date, if the raw string was parseable.
    pub fn date(&self) -> Option<Date> {
        self.parsed
    }

    /// The raw string as found on (or derived for) the source row.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the raw string parsed to a calendar date.
    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Total descending order over event dates: newest first, unparseable last.
pub fn cmp_desc(a: &EventDate, b: &EventDate) -> Ordering {
    match (a.parsed, b.parsed) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// An inclusive calendar-date filter window; either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl DateRange {
    /// A range that admits every date.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A range between two inclusive bounds.
    pub fn between(from: Option<Date>, to: Option<Date>) -> Self {
        Self { from, to }
    }

    /// Whether either bound is set.
    pub fn is_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Test a (possibly unparseable) event date against the window.
    ///
    /// An unparseable date cannot be placed on the calendar, so it passes
    /// only an unbounded range.
    pub fn contains(&self, date: Option<Date>) -> bool {
        if !self.is_bounded() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-03-01"), Some(date!(2024 - 03 - 01)));
        assert_eq!(parse_date("01/03/2024"), Some(date!(2024 - 03 - 01)));
        assert_eq!(parse_date("2024-03-01 10:30:00"), Some(date!(2024 - 03 - 01)));
        assert_eq!(parse_date("2024-03-01T10:30:00"), Some(date!(2024 - 03 - 01)));
        assert_eq!(parse_date("  2024-03-01  "), Some(date!(2024 - 03 - 01)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn test_add_days() {
        assert_eq!(
            add_days(date!(2024 - 03 - 01), 20),
            Some(date!(2024 - 03 - 21))
        );
        assert_eq!(
            add_days(date!(2024 - 01 - 10), 30),
            Some(date!(2024 - 02 - 09))
        );
    }

    #[test]
    fn test_add_months_plain() {
        assert_eq!(
            add_months(date!(2024 - 03 - 01), 9),
            Some(date!(2024 - 12 - 01))
        );
        assert_eq!(
            add_months(date!(2024 - 06 - 15), 9),
            Some(date!(2025 - 03 - 15))
        );
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(
            add_months(date!(2024 - 05 - 31), 9),
            Some(date!(2025 - 02 - 28))
        );
        // Leap year target keeps the 29th available.
        assert_eq!(
            add_months(date!(2023 - 05 - 31), 9),
            Some(date!(2024 - 02 - 29))
        );
        assert_eq!(
            add_months(date!(2024 - 01 - 31), 1),
            Some(date!(2024 - 02 - 29))
        );
    }

    #[test]
    fn test_event_date_parse() {
        assert!(EventDate::parse("").is_none());
        assert!(EventDate::parse("   ").is_none());

        let valid = EventDate::parse("2024-03-01").unwrap();
        assert!(valid.is_valid());
        assert_eq!(valid.date(), Some(date!(2024 - 03 - 01)));

        let garbled = EventDate::parse("sometime soon").unwrap();
        assert!(!garbled.is_valid());
        assert_eq!(garbled.raw(), "sometime soon");
    }

    #[test]
    fn test_cmp_desc_orders_newest_first_invalid_last() {
        let newer = EventDate::from_date(date!(2024 - 06 - 01));
        let older = EventDate::from_date(date!(2024 - 01 - 01));
        let invalid = EventDate::parse("??").unwrap();

        assert_eq!(cmp_desc(&newer, &older), Ordering::Less);
        assert_eq!(cmp_desc(&older, &newer), Ordering::Greater);
        assert_eq!(cmp_desc(&newer, &invalid), Ordering::Less);
        assert_eq!(cmp_desc(&invalid, &newer), Ordering::Greater);
        assert_eq!(cmp_desc(&invalid, &invalid.clone()), Ordering::Equal);
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::between(Some(date!(2024 - 01 - 01)), Some(date!(2024 - 12 - 31)));
        assert!(range.contains(Some(date!(2024 - 06 - 01))));
        assert!(range.contains(Some(date!(2024 - 01 - 01))));
        assert!(range.contains(Some(date!(2024 - 12 - 31))));
        assert!(!range.contains(Some(date!(2025 - 01 - 01))));
        assert!(!range.contains(None));

        assert!(DateRange::unbounded().contains(None));
        assert!(DateRange::unbounded().contains(Some(date!(1999 - 01 - 01))));

        let open_start = DateRange::between(None, Some(date!(2024 - 06 - 30)));
        assert!(open_start.contains(Some(date!(2020 - 01 - 01))));
        assert!(!open_start.contains(Some(date!(2024 - 07 - 01))));
    }
}
