//! Merge discharged admissions and discharged patients into one board list.

use serde::Serialize;

use super::dedup::dedup_by_candidate_keys;
use super::DischargeStore;
use crate::models::{
    admission_days, format_duration, AdmissionRecord, DischargeSummary, DischargedPatientView,
    PatientRecord,
};

/// A freshly reconciled discharge list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReconcileOutcome {
    pub patients: Vec<DischargedPatientView>,
    /// Raw candidates from both sources that did not make it into `patients`
    pub duplicates_removed: usize,
    /// The discharged-admissions query failed and contributed nothing
    pub admissions_failed: bool,
    /// The discharged-patients query failed and contributed nothing
    pub patients_failed: bool,
}

/// Build the discharge list from both sources.
///
/// Never fails: a failed source query counts as an empty source, and a failed
/// enrichment lookup leaves that one row at its fallback values.
pub fn reconcile<S: DischargeStore>(store: &S, patient_scan_limit: usize) -> ReconcileOutcome {
    let (admissions, admissions_failed) = match store.discharged_admissions() {
        Ok(admissions) => (admissions, false),
        Err(e) => {
            tracing::warn!(error = %e, "discharged admissions query failed");
            (Vec::new(), true)
        }
    };

    let (patients, patients_failed) = match store.discharged_patients(patient_scan_limit) {
        Ok(patients) => (patients, false),
        Err(e) => {
            tracing::warn!(error = %e, "discharged patients query failed");
            (Vec::new(), true)
        }
    };

    let raw_candidates = admissions.len() + patients.len();

    let mut merged: Vec<DischargedPatientView> = admissions
        .iter()
        .map(|admission| view_from_admission(store, admission))
        .collect();

    for patient in patients {
        if merged.iter().any(|view| same_person(&view.patient, &patient)) {
            continue;
        }
        let view = view_from_patient(store, patient);
        merged.push(view);
    }

    let deduped = dedup_by_candidate_keys(merged);
    let duplicates_removed = raw_candidates - deduped.kept.len();

    tracing::info!(
        admissions = admissions.len(),
        kept = deduped.kept.len(),
        duplicates_removed,
        "reconciled discharged patients"
    );

    ReconcileOutcome {
        patients: deduped.kept,
        duplicates_removed,
        admissions_failed,
        patients_failed,
    }
}

/// Whether two records share an identifier, including crossed `id`/`patient_id`.
pub fn same_person(a: &PatientRecord, b: &PatientRecord) -> bool {
    fn eq(x: &str, y: &str) -> bool {
        !x.is_empty() && x == y
    }
    eq(&a.id, &b.id)
        || eq(&a.patient_id, &b.patient_id)
        || eq(&a.id, &b.patient_id)
        || eq(&a.patient_id, &b.id)
}

/// Row for a discharged admission, enriched from its summary when one loads.
pub fn view_from_admission<S: DischargeStore>(
    store: &S,
    admission: &AdmissionRecord,
) -> DischargedPatientView {
    let patient = admission
        .patient
        .clone()
        .unwrap_or_else(|| PatientRecord::placeholder(&admission.patient_ref));

    let summary = match store.summary_for_admission(&admission.id) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(
                admission_id = %admission.id,
                error = %e,
                "discharge summary lookup failed, using admission fields"
            );
            None
        }
    };

    let summary_discharge = summary
        .as_ref()
        .and_then(|s| s.discharge_date.clone())
        .filter(|d| !d.trim().is_empty());
    let discharge_date = summary_discharge
        .or_else(|| Some(admission.updated_at.clone()).filter(|d| !d.trim().is_empty()));

    let admission_duration = discharge_date
        .as_deref()
        .and_then(|end| admission_days(&admission.admission_date, end))
        .map(format_duration);

    let mut view = enrich(patient, summary);
    view.admission_id = Some(admission.id.clone());
    view.discharge_date = discharge_date;
    view.admission_duration = admission_duration;
    view
}

/// Row for a discharged patient with no admission on the board yet.
pub fn view_from_patient<S: DischargeStore>(
    store: &S,
    patient: PatientRecord,
) -> DischargedPatientView {
    let latest = match store.discharge_history(&patient.id) {
        Ok(history) => history.into_iter().next(),
        Err(e) => {
            tracing::warn!(
                patient = %patient.id,
                error = %e,
                "discharge history lookup failed, omitting summary"
            );
            None
        }
    };

    let admission_id = latest.as_ref().map(|s| s.admission_id.clone());
    let discharge_date = latest
        .as_ref()
        .and_then(|s| s.discharge_date.clone())
        .filter(|d| !d.trim().is_empty());

    let mut view = enrich(patient, latest);
    view.admission_id = admission_id.filter(|id| !id.is_empty());
    view.discharge_date = discharge_date;
    view
}

/// Diagnosis and bill with their fallback chains applied.
fn enrich(patient: PatientRecord, summary: Option<DischargeSummary>) -> DischargedPatientView {
    let mut view = DischargedPatientView::bare(patient);

    if let Some(diagnosis) = summary.as_ref().and_then(|s| s.diagnosis()) {
        view.final_diagnosis = diagnosis.to_string();
    }

    view.total_bill_amount = summary
        .as_ref()
        .and_then(|s| s.bill_total())
        .or(view.patient.total_spent)
        .unwrap_or(0.0);

    view.discharge_summary = summary;
    view
}
