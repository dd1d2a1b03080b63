//! Reconciliation integration tests.
//!
//! Drive `reconcile` and `undischarge` through an in-memory store double so
//! source and enrichment failures can be injected per call.

use std::cell::RefCell;
use std::collections::HashMap;

use hospital_core::discharge::{reconcile, undischarge, DischargeStore};
use hospital_core::models::{
    AdmissionRecord, AdmissionStatus, DischargeBilling, DischargeSummary, DischargedPatientView,
    PatientRecord,
};

#[derive(Debug, thiserror::Error)]
#[error("backend unavailable")]
struct Offline;

#[derive(Default)]
struct FakeStore {
    admissions: Vec<AdmissionRecord>,
    patients: Vec<PatientRecord>,
    summaries: HashMap<String, DischargeSummary>,
    history: HashMap<String, Vec<DischargeSummary>>,
    fail_admissions: bool,
    fail_patients: bool,
    fail_summary_for: Vec<String>,
    fail_history_for: Vec<String>,
    fail_delete: bool,
    fail_restore: bool,
    restored: RefCell<Vec<String>>,
    cleared: RefCell<Vec<String>>,
}

impl DischargeStore for FakeStore {
    type Error = Offline;

    fn discharged_admissions(&self) -> Result<Vec<AdmissionRecord>, Offline> {
        if self.fail_admissions {
            return Err(Offline);
        }
        Ok(self.admissions.clone())
    }

    fn discharged_patients(&self, limit: usize) -> Result<Vec<PatientRecord>, Offline> {
        if self.fail_patients {
            return Err(Offline);
        }
        Ok(self.patients.iter().take(limit).cloned().collect())
    }

    fn summary_for_admission(&self, admission_id: &str) -> Result<Option<DischargeSummary>, Offline> {
        if self.fail_summary_for.iter().any(|id| id == admission_id) {
            return Err(Offline);
        }
        Ok(self.summaries.get(admission_id).cloned())
    }

    fn discharge_history(&self, patient_ref: &str) -> Result<Vec<DischargeSummary>, Offline> {
        if self.fail_history_for.iter().any(|id| id == patient_ref) {
            return Err(Offline);
        }
        Ok(self.history.get(patient_ref).cloned().unwrap_or_default())
    }

    fn latest_discharged_admission(&self, patient_ref: &str) -> Result<Option<AdmissionRecord>, Offline> {
        Ok(self
            .admissions
            .iter()
            .find(|a| a.patient_ref == patient_ref)
            .cloned())
    }

    fn delete_summary(&self, _summary_id: &str) -> Result<bool, Offline> {
        if self.fail_delete {
            return Err(Offline);
        }
        Ok(true)
    }

    fn clear_ipd_status(&self, patient_ref: &str) -> Result<bool, Offline> {
        self.cleared.borrow_mut().push(patient_ref.to_string());
        Ok(true)
    }

    fn set_admission_status(&self, admission_id: &str, status: AdmissionStatus) -> Result<bool, Offline> {
        if self.fail_restore {
            return Err(Offline);
        }
        assert_eq!(status, AdmissionStatus::Admitted);
        self.restored.borrow_mut().push(admission_id.to_string());
        Ok(true)
    }
}

fn patient(id: &str, patient_id: &str, first: &str, last: &str) -> PatientRecord {
    PatientRecord {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        ipd_status: Some("DISCHARGED".to_string()),
        ..PatientRecord::default()
    }
}

fn admission(id: &str, joined: Option<PatientRecord>, patient_ref: &str, admitted: &str, updated: &str) -> AdmissionRecord {
    AdmissionRecord {
        id: id.to_string(),
        patient_ref: patient_ref.to_string(),
        patient: joined,
        bed_id: None,
        admission_date: admitted.to_string(),
        status: AdmissionStatus::Discharged,
        updated_at: updated.to_string(),
    }
}

fn find<'a>(rows: &'a [DischargedPatientView], id: &str) -> &'a DischargedPatientView {
    rows.iter().find(|v| v.patient.id == id).unwrap()
}

#[test]
fn test_same_patient_in_both_sources_yields_one_row() {
    let asha = patient("p1", "PID1", "Asha", "Rao");
    let store = FakeStore {
        admissions: vec![admission("a1", Some(asha.clone()), "p1", "2024-01-01", "2024-01-06")],
        patients: vec![asha],
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 10_000);

    assert_eq!(outcome.patients.len(), 1);
    assert_eq!(outcome.patients[0].admission_duration.as_deref(), Some("5 days"));
    assert_eq!(outcome.duplicates_removed, 1);
    assert!(!outcome.admissions_failed);
    assert!(!outcome.patients_failed);
}

#[test]
fn test_cross_source_matching_variants() {
    // Shared human-readable ID, crossed IDs, and an exact ID match.
    let store = FakeStore {
        admissions: vec![
            admission("a1", Some(patient("p1", "PID1", "Asha", "Rao")), "p1", "2024-01-01", "2024-01-02"),
            admission("a2", Some(patient("p2", "PID2", "Ravi", "Kumar")), "p2", "2024-01-01", "2024-01-02"),
            admission("a3", Some(patient("p3", "PID3", "Meera", "Nair")), "p3", "2024-01-01", "2024-01-02"),
        ],
        patients: vec![
            patient("other-uuid", "PID1", "Asha", "Rao"),
            patient("PID2", "p2", "Ravi", "Kumar"),
            patient("p3", "", "Meera", "Nair"),
        ],
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 10_000);
    assert_eq!(outcome.patients.len(), 3);
    assert_eq!(outcome.duplicates_removed, 3);
}

#[test]
fn test_final_pass_catches_what_pairwise_check_misses() {
    // Two patient-source rows differing only in which ID field is populated,
    // tied together by name and phone.
    let mut first = patient("p9", "", "Kiran", "Das");
    first.phone = "9000000001".to_string();
    let mut second = patient("", "PID9", "Kiran", "Das");
    second.phone = "9000000001".to_string();

    let store = FakeStore {
        patients: vec![first, second],
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 10_000);
    assert_eq!(outcome.patients.len(), 1);
    assert_eq!(outcome.patients[0].patient.id, "p9");
    assert_eq!(outcome.duplicates_removed, 1);
}

#[test]
fn test_final_pass_merges_split_ids_without_phone() {
    let store = FakeStore {
        patients: vec![
            patient("p9", "", "Kiran", "Das"),
            patient("", "PID9", "Kiran", "Das"),
        ],
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 10_000);
    assert_eq!(outcome.patients.len(), 1);
    assert_eq!(outcome.patients[0].patient.id, "p9");
    assert_eq!(outcome.duplicates_removed, 1);
}

#[test]
fn test_bill_falls_back_to_total_spent() {
    let mut asha = patient("p1", "PID1", "Asha", "Rao");
    asha.total_spent = Some(12_750.0);
    let store = FakeStore {
        admissions: vec![admission("a1", Some(asha), "p1", "2024-01-01", "2024-01-03")],
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 10_000);
    assert_eq!(outcome.patients[0].total_bill_amount, 12_750.0);
}

#[test]
fn test_summary_bill_wins_over_total_spent() {
    let mut asha = patient("p1", "PID1", "Asha", "Rao");
    asha.total_spent = Some(12_750.0);
    let mut summary = DischargeSummary::new("a1".into(), "p1".into());
    summary.discharge_date = Some("2024-01-02".into());
    summary.billing = Some(DischargeBilling { total_amount: 3_100.0 });

    let store = FakeStore {
        admissions: vec![admission("a1", Some(asha), "p1", "2024-01-01", "2024-01-09")],
        summaries: HashMap::from([("a1".to_string(), summary)]),
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 10_000);
    let row = &outcome.patients[0];
    assert_eq!(row.total_bill_amount, 3_100.0);
    assert_eq!(row.admission_duration.as_deref(), Some("1 day"));
    assert_eq!(row.discharge_date.as_deref(), Some("2024-01-02"));
}

#[test]
fn test_admission_source_failure_degrades_to_patients() {
    let store = FakeStore {
        fail_admissions: true,
        patients: vec![patient("p1", "PID1", "Asha", "Rao")],
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 10_000);
    assert!(outcome.admissions_failed);
    assert!(!outcome.patients_failed);
    assert_eq!(outcome.patients.len(), 1);
}

#[test]
fn test_both_sources_failing_is_not_fatal() {
    let store = FakeStore {
        fail_admissions: true,
        fail_patients: true,
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 10_000);
    assert!(outcome.patients.is_empty());
    assert_eq!(outcome.duplicates_removed, 0);
    assert!(outcome.admissions_failed && outcome.patients_failed);
}

#[test]
fn test_enrichment_failure_degrades_one_record() {
    let mut good_summary = DischargeSummary::new("a2".into(), "p2".into());
    good_summary.final_diagnosis = Some("Appendicitis".into());

    let store = FakeStore {
        admissions: vec![
            admission("a1", Some(patient("p1", "PID1", "Asha", "Rao")), "p1", "2024-01-01", "2024-01-04"),
            admission("a2", Some(patient("p2", "PID2", "Ravi", "Kumar")), "p2", "2024-01-01", "2024-01-04"),
        ],
        patients: vec![patient("p3", "PID3", "Meera", "Nair")],
        summaries: HashMap::from([("a2".to_string(), good_summary)]),
        fail_summary_for: vec!["a1".to_string()],
        fail_history_for: vec!["p3".to_string()],
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 10_000);
    assert_eq!(outcome.patients.len(), 3);

    let rows = &outcome.patients;
    assert_eq!(find(rows, "p1").final_diagnosis, "Not specified");
    assert_eq!(find(rows, "p1").admission_duration.as_deref(), Some("3 days"));
    assert_eq!(find(rows, "p2").final_diagnosis, "Appendicitis");
    assert!(find(rows, "p3").discharge_summary.is_none());
    assert!(find(rows, "p3").discharge_date.is_none());
}

#[test]
fn test_patient_scan_limit_applied() {
    let store = FakeStore {
        patients: (0..5)
            .map(|i| patient(&format!("p{}", i), &format!("PID{}", i), "P", &i.to_string()))
            .collect(),
        ..FakeStore::default()
    };

    let outcome = reconcile(&store, 3);
    assert_eq!(outcome.patients.len(), 3);
}

#[test]
fn test_undischarge_aborts_when_summary_delete_fails() {
    let asha = patient("p1", "PID1", "Asha", "Rao");
    let mut view = DischargedPatientView::bare(asha);
    view.discharge_summary = Some(DischargeSummary::new("a1".into(), "p1".into()));
    view.admission_id = Some("a1".into());

    let store = FakeStore {
        fail_delete: true,
        ..FakeStore::default()
    };

    assert!(undischarge(&store, &view).is_err());
    assert!(store.cleared.borrow().is_empty());
    assert!(store.restored.borrow().is_empty());
}

#[test]
fn test_undischarge_restore_failure_still_succeeds() {
    let mut view = DischargedPatientView::bare(patient("p1", "PID1", "Asha", "Rao"));
    view.admission_id = Some("a1".into());

    let store = FakeStore {
        fail_restore: true,
        ..FakeStore::default()
    };

    let outcome = undischarge(&store, &view).unwrap();
    assert!(!outcome.admission_restored);
    assert_eq!(*store.cleared.borrow(), vec!["p1".to_string()]);
}
