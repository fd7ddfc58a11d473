use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::store::{
    AndrologicalExamRow, DiagnosisRow, GestationRow, ManualEventRow, MemorySource,
    ReceptorInvoiceRow,
};

/// Receptor invoice line fixture.
pub fn receptor_invoice(
    invoice_id: i64,
    item_id: i64,
    tattoo: Option<&str>,
    arrival_date: Option<&str>,
    transfer_date: Option<&str>,
) -> ReceptorInvoiceRow {
    ReceptorInvoiceRow {
        invoice_id,
        item_id,
        arrival_date: arrival_date.map(str::to_string),
        transfer_date: transfer_date.map(str::to_string),
        tattoo: tattoo.map(str::to_string),
        supplier: "Fazenda Aurora".to_string(),
        invoice_number: format!("NF-{:05}", invoice_id),
        ..Default::default()
    }
}

/// Manual calendar row fixture.
pub fn manual_event(id: i64, title: &str, event_date: &str, status: &str) -> ManualEventRow {
    ManualEventRow {
        id,
        title: title.to_string(),
        event_date: event_date.to_string(),
        status: status.to_string(),
        ..Default::default()
    }
}

/// Diagnosis ledger row fixture keyed by tattoo.
pub fn diagnosis_by_tattoo(tattoo: &str, outcome: &str) -> DiagnosisRow {
    DiagnosisRow {
        tattoo: Some(tattoo.to_string()),
        outcome: outcome.to_string(),
        ..Default::default()
    }
}

/// Diagnosis ledger row fixture keyed by breed code and number.
pub fn diagnosis_by_number(breed_code: &str, number: &str, outcome: &str) -> DiagnosisRow {
    DiagnosisRow {
        breed_code: Some(breed_code.to_string()),
        number: Some(number.to_string()),
        outcome: outcome.to_string(),
        ..Default::default()
    }
}

/// Andrological exam row fixture.
pub fn exam(
    exam_id: i64,
    breed_code: &str,
    number: &str,
    exam_date: &str,
    outcome: &str,
    rescheduled: bool,
) -> AndrologicalExamRow {
    AndrologicalExamRow {
        exam_id,
        breed_code: Some(breed_code.to_string()),
        number: Some(number.to_string()),
        animal_name: format!("{} {}", breed_code, number),
        exam_date: exam_date.to_string(),
        outcome: outcome.to_string(),
        rescheduled,
        ..Default::default()
    }
}

/// Gestation row fixture.
pub fn gestation(
    id: i64,
    breed_code: &str,
    number: &str,
    service_date: &str,
    service_method: &str,
) -> GestationRow {
    GestationRow {
        id,
        breed_code: Some(breed_code.to_string()),
        number: Some(number.to_string()),
        animal_name: format!("{} {}", breed_code, number),
        service_date: service_date.to_string(),
        service_method: service_method.to_string(),
    }
}

/// Generate a deterministic herd of receptor invoices with a sprinkling of
/// diagnoses, for volume-oriented tests.
///
/// Every receptor arrives in 2024; `diagnosed_probability` controls how many
/// already carry a ledger entry, half of which are negative.
pub fn sample_herd_source(count: u32, diagnosed_probability: f64, seed: u64) -> MemorySource {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut source = MemorySource::new();

    for i in 1..=count {
        let tattoo = format!("RPT{:04}", i);
        let month = rng.random_range(1..=12u8);
        let day = rng.random_range(1..=28u8);
        let arrival = format!("2024-{:02}-{:02}", month, day);
        let transfer = if rng.random_bool(0.5) {
            Some(arrival.clone())
        } else {
            None
        };

        source.push_receptor(receptor_invoice(
            i as i64,
            1,
            Some(&tattoo),
            Some(&arrival),
            transfer.as_deref(),
        ));

        if rng.random_bool(diagnosed_probability) {
            let outcome = if rng.random_bool(0.5) {
                "positive"
            } else {
                "negative"
            };
            source.push_diagnosis(diagnosis_by_tattoo(&tattoo, outcome));
        }
    }

    source
}
