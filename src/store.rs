//! # Store Module
//!
//! Read-only access to the source tables the reconciliation consumes. The
//! relational store itself is an external collaborator; this module defines
//! the row shapes each adapter reads and the [`EventSource`] trait the
//! engine queries through, plus an in-memory implementation for tests and
//! embedding.

use anyhow::Result;

/// An operator-entered calendar row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualEventRow {
    pub id: i64,
    pub title: String,
    pub animal_id: Option<i64>,
    pub event_date: String,
    pub event_type: String,
    pub description: String,
    pub status: String,
}

/// An invoice line flagged as the acquisition of a receptor animal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceptorInvoiceRow {
    pub invoice_id: i64,
    pub item_id: i64,
    /// Invoice date, taken as the receptor's arrival date.
    pub arrival_date: Option<String>,
    /// Embryo-transfer date recorded on the invoice, when known.
    pub transfer_date: Option<String>,
    pub tattoo: Option<String>,
    pub receptor_letter: Option<String>,
    pub receptor_number: Option<String>,
    pub supplier: String,
    pub invoice_number: String,
}

/// A pregnancy-diagnosis record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisRow {
    pub breed_code: Option<String>,
    pub number: Option<String>,
    pub tattoo: Option<String>,
    pub diagnosis_date: Option<String>,
    pub outcome: String,
}

/// An embryo-transfer record that carries its own diagnosis outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbryoTransferRow {
    pub receptor_breed_code: Option<String>,
    pub receptor_number: Option<String>,
    pub receptor_tattoo: Option<String>,
    pub outcome: Option<String>,
}

/// A male-fertility exam record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndrologicalExamRow {
    pub exam_id: i64,
    pub breed_code: Option<String>,
    pub number: Option<String>,
    pub animal_name: String,
    pub exam_date: String,
    pub outcome: String,
    pub rescheduled: bool,
    pub reschedule_date: Option<String>,
}

/// A gestation record used for birth prediction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestationRow {
    pub id: i64,
    pub breed_code: Option<String>,
    pub number: Option<String>,
    pub animal_name: String,
    pub service_date: String,
    pub service_method: String,
}

/// Read-only query interface over the source tables.
///
/// Each method corresponds to one backing query; a method returning `Err`
/// means that source is unavailable, which the aggregator degrades to an
/// empty contribution rather than a failed request.
pub trait EventSource {
    fn manual_events(&self) -> Result<Vec<ManualEventRow>>;
    fn receptor_invoices(&self) -> Result<Vec<ReceptorInvoiceRow>>;
    fn diagnosis_records(&self) -> Result<Vec<DiagnosisRow>>;
    fn embryo_transfers(&self) -> Result<Vec<EmbryoTransferRow>>;
    fn andrological_exams(&self) -> Result<Vec<AndrologicalExamRow>>;
    fn gestations(&self) -> Result<Vec<GestationRow>>;
}

/// In-memory [`EventSource`], populated row by row.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    manual: Vec<ManualEventRow>,
    receptors: Vec<ReceptorInvoiceRow>,
    diagnoses: Vec<DiagnosisRow>,
    transfers: Vec<EmbryoTransferRow>,
    exams: Vec<AndrologicalExamRow>,
    gestations: Vec<GestationRow>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_manual(&mut self, row: ManualEventRow) {
        self.manual.push(row);
    }

    pub fn push_receptor(&mut self, row: ReceptorInvoiceRow) {
        self.receptors.push(row);
    }

    pub fn push_diagnosis(&mut self, row: DiagnosisRow) {
        self.diagnoses.push(row);
    }

    pub fn push_transfer(&mut self, row: EmbryoTransferRow) {
        self.transfers.push(row);
    }

    pub fn push_exam(&mut self, row: AndrologicalExamRow) {
        self.exams.push(row);
    }

    pub fn push_gestation(&mut self, row: GestationRow) {
        self.gestations.push(row);
    }
}

impl EventSource for MemorySource {
    fn manual_events(&self) -> Result<Vec<ManualEventRow>> {
        Ok(self.manual.clone())
    }

    fn receptor_invoices(&self) -> Result<Vec<ReceptorInvoiceRow>> {
        Ok(self.receptors.clone())
    }

    fn diagnosis_records(&self) -> Result<Vec<DiagnosisRow>> {
        Ok(self.diagnoses.clone())
    }

    fn embryo_transfers(&self) -> Result<Vec<EmbryoTransferRow>> {
        Ok(self.transfers.clone())
    }

    fn andrological_exams(&self) -> Result<Vec<AndrologicalExamRow>> {
        Ok(self.exams.clone())
    }

    fn gestations(&self) -> Result<Vec<GestationRow>> {
        Ok(self.gestations.clone())
    }
}
