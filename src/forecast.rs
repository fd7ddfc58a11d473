//! # Forecast Module
//!
//! Biological interval arithmetic: given an anchor date and an
//! event-type-specific offset rule, compute the predicted date.
//!
//! The gestation offsets deliberately differ by data source (276 days for
//! embryo transfer, 280 for insemination, 285 for natural cover, 290 when
//! the method is unknown, and 9 calendar months for receptor invoice
//! lines). The herd books these figures came from never agreed on one
//! number, so each source keeps its own independently tunable constant
//! instead of a unified guess.

use crate::temporal::{add_days, add_months};
use time::Date;

/// Days between a receptor's arrival and its scheduled pregnancy diagnosis.
pub const RECEPTOR_DIAGNOSIS_LEAD_DAYS: i64 = 20;
/// Calendar months between an embryo transfer on a receptor invoice and the
/// predicted birth.
pub const RECEPTOR_GESTATION_MONTHS: u32 = 9;
/// Days between a failed andrological exam and its re-test.
pub const ANDROLOGICAL_RETEST_DAYS: i64 = 30;
/// Gestation length for an embryo-transfer service, in days.
pub const GESTATION_DAYS_EMBRYO_TRANSFER: i64 = 276;
/// Gestation length for an artificial-insemination service, in days.
pub const GESTATION_DAYS_INSEMINATION: i64 = 280;
/// Gestation length for a natural-cover service, in days.
pub const GESTATION_DAYS_NATURAL_COVER: i64 = 285;
/// Gestation length when the service method is not recorded, in days.
pub const GESTATION_DAYS_UNKNOWN: i64 = 290;

/// How a gestation was initiated, as recorded on the gestation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceMethod {
    EmbryoTransfer,
    Insemination,
    NaturalCover,
    Unknown,
}

impl ServiceMethod {
    /// Map a stored method label; unrecognized labels count as unknown.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "et" | "embryo-transfer" | "embryo transfer" => Self::EmbryoTransfer,
            "ai" | "insemination" | "artificial-insemination" => Self::Insemination,
            "natural" | "natural-cover" | "natural cover" => Self::NaturalCover,
            _ => Self::Unknown,
        }
    }
}

/// Per-source forecast offsets. Defaults to the constants above; construct
/// a custom value to tune an individual source without touching the others.
#[derive(Debug, Clone)]
pub struct ForecastRules {
    pub diagnosis_lead_days: i64,
    pub receptor_gestation_months: u32,
    pub retest_days: i64,
    pub gestation_days_embryo_transfer: i64,
    pub gestation_days_insemination: i64,
    pub gestation_days_natural_cover: i64,
    pub gestation_days_unknown: i64,
}

impl Default for ForecastRules {
    fn default() -> Self {
        Self {
            diagnosis_lead_days: RECEPTOR_DIAGNOSIS_LEAD_DAYS,
            receptor_gestation_months: RECEPTOR_GESTATION_MONTHS,
            retest_days: ANDROLOGICAL_RETEST_DAYS,
            gestation_days_embryo_transfer: GESTATION_DAYS_EMBRYO_TRANSFER,
            gestation_days_insemination: GESTATION_DAYS_INSEMINATION,
            gestation_days_natural_cover: GESTATION_DAYS_NATURAL_COVER,
            gestation_days_unknown: GESTATION_DAYS_UNKNOWN,
        }
    }
}

impl ForecastRules {
    /// Diagnosis due date for a receptor that arrived on `arrival`.
    pub fn diagnosis_due(&self, arrival: Date) -> Option<Date> {
        add_days(arrival, self.diagnosis_lead_days)
    }

    /// Predicted birth for an embryo transfer recorded on a receptor
    /// invoice line.
    pub fn receptor_birth_due(&self, transfer: Date) -> Option<Date> {
        add_months(transfer, self.receptor_gestation_months)
    }

    /// Re-test date for an unfit andrological exam.
    pub fn retest_due(&self, exam: Date) -> Option<Date> {
        add_days(exam, self.retest_days)
    }

    /// Predicted birth for a gestation record, by service method.
    pub fn birth_due(&self, method: ServiceMethod, service: Date) -> Option<Date> {
        let days = match method {
            ServiceMethod::EmbryoTransfer => self.gestation_days_embryo_transfer,
            ServiceMethod::Insemination => self.gestation_days_insemination,
            ServiceMethod::NaturalCover => self.gestation_days_natural_cover,
            ServiceMethod::Unknown => self.gestation_days_unknown,
        };
        add_days(service, days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_diagnosis_due() {
        let rules = ForecastRules::default();
        assert_eq!(
            rules.diagnosis_due(date!(2024 - 03 - 01)),
            Some(date!(2024 - 03 - 21))
        );
    }

    #[test]
    fn test_receptor_birth_uses_calendar_months() {
        let rules = ForecastRules::default();
        assert_eq!(
            rules.receptor_birth_due(date!(2024 - 03 - 01)),
            Some(date!(2024 - 12 - 01))
        );
        // Month arithmetic, not 270-odd days: end of month clamps.
        assert_eq!(
            rules.receptor_birth_due(date!(2024 - 05 - 31)),
            Some(date!(2025 - 02 - 28))
        );
    }

    #[test]
    fn test_retest_due() {
        let rules = ForecastRules::default();
        assert_eq!(
            rules.retest_due(date!(2024 - 01 - 10)),
            Some(date!(2024 - 02 - 09))
        );
    }

    #[test]
    fn test_birth_due_keeps_per_method_offsets() {
        let rules = ForecastRules::default();
        let service = date!(2024 - 01 - 01);
        assert_eq!(
            rules.birth_due(ServiceMethod::EmbryoTransfer, service),
            add_days(service, 276)
        );
        assert_eq!(
            rules.birth_due(ServiceMethod::Insemination, service),
            add_days(service, 280)
        );
        assert_eq!(
            rules.birth_due(ServiceMethod::NaturalCover, service),
            add_days(service, 285)
        );
        assert_eq!(
            rules.birth_due(ServiceMethod::Unknown, service),
            add_days(service, 290)
        );
    }

    #[test]
    fn test_service_method_labels() {
        assert_eq!(ServiceMethod::from_label("ET"), ServiceMethod::EmbryoTransfer);
        assert_eq!(ServiceMethod::from_label("ai"), ServiceMethod::Insemination);
        assert_eq!(
            ServiceMethod::from_label("Natural Cover"),
            ServiceMethod::NaturalCover
        );
        assert_eq!(ServiceMethod::from_label(""), ServiceMethod::Unknown);
        assert_eq!(ServiceMethod::from_label("mystery"), ServiceMethod::Unknown);
    }
}
