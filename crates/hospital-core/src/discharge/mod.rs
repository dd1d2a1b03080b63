//! Discharged-patient reconciliation.
//!
//! Pipeline: discharged admissions + discharged patients → enrichment →
//! merge → candidate-key dedup → [`DischargeBoard`] (search/filter/sort).
//!
//! Every backend call goes through [`DischargeStore`], so the pipeline runs
//! unchanged against SQLite or a test double.

mod board;
mod dedup;
mod reconcile;
mod removal;

pub use board::*;
pub use dedup::*;
pub use reconcile::*;
pub use removal::*;

use thiserror::Error;

use crate::models::{AdmissionRecord, AdmissionStatus, DischargeSummary, PatientRecord};

/// Reconciliation and un-discharge errors.
#[derive(Error, Debug)]
pub enum DischargeError {
    #[error("Store error: {0}")]
    Store(Box<dyn std::error::Error + Send + Sync>),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl DischargeError {
    pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        DischargeError::Store(Box::new(e))
    }
}

pub type DischargeResult<T> = Result<T, DischargeError>;

/// Queries and mutations the discharge board needs from the backend.
pub trait DischargeStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Admissions with status DISCHARGED, each joined to its patient when possible.
    fn discharged_admissions(&self) -> Result<Vec<AdmissionRecord>, Self::Error>;

    /// Patients whose `ipd_status` is DISCHARGED, capped at `limit`.
    fn discharged_patients(&self, limit: usize) -> Result<Vec<PatientRecord>, Self::Error>;

    /// Summary closing one admission.
    fn summary_for_admission(
        &self,
        admission_id: &str,
    ) -> Result<Option<DischargeSummary>, Self::Error>;

    /// Summaries for one patient, most recent first.
    fn discharge_history(&self, patient_ref: &str) -> Result<Vec<DischargeSummary>, Self::Error>;

    /// Latest discharged admission for a patient.
    fn latest_discharged_admission(
        &self,
        patient_ref: &str,
    ) -> Result<Option<AdmissionRecord>, Self::Error>;

    /// Delete a summary; returns whether a row existed.
    fn delete_summary(&self, summary_id: &str) -> Result<bool, Self::Error>;

    /// Reset a patient's `ipd_status` to null; returns whether a row existed.
    fn clear_ipd_status(&self, patient_ref: &str) -> Result<bool, Self::Error>;

    /// Change an admission's status; returns whether a row existed.
    fn set_admission_status(
        &self,
        admission_id: &str,
        status: AdmissionStatus,
    ) -> Result<bool, Self::Error>;
}
