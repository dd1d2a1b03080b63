//! `DischargeStore` backed by SQLite.

use super::{Database, DbError};
use crate::discharge::DischargeStore;
use crate::models::{AdmissionRecord, AdmissionStatus, DischargeSummary, PatientRecord};

impl DischargeStore for Database {
    type Error = DbError;

    fn discharged_admissions(&self) -> Result<Vec<AdmissionRecord>, DbError> {
        self.list_admissions_by_status(AdmissionStatus::Discharged)
    }

    fn discharged_patients(&self, limit: usize) -> Result<Vec<PatientRecord>, DbError> {
        self.list_discharged_patients(limit)
    }

    fn summary_for_admission(
        &self,
        admission_id: &str,
    ) -> Result<Option<DischargeSummary>, DbError> {
        self.get_summary_for_admission(admission_id)
    }

    fn discharge_history(&self, patient_ref: &str) -> Result<Vec<DischargeSummary>, DbError> {
        self.list_discharge_history(patient_ref)
    }

    fn latest_discharged_admission(
        &self,
        patient_ref: &str,
    ) -> Result<Option<AdmissionRecord>, DbError> {
        self.latest_admission_for_patient(patient_ref, AdmissionStatus::Discharged)
    }

    fn delete_summary(&self, summary_id: &str) -> Result<bool, DbError> {
        self.delete_discharge_summary(summary_id)
    }

    fn clear_ipd_status(&self, patient_ref: &str) -> Result<bool, DbError> {
        self.set_patient_ipd_status(patient_ref, None)
    }

    fn set_admission_status(
        &self,
        admission_id: &str,
        status: AdmissionStatus,
    ) -> Result<bool, DbError> {
        Database::set_admission_status(self, admission_id, status)
    }
}
