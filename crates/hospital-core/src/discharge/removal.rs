//! Un-discharge: remove a row from the board and roll back its discharge.

use serde::Serialize;

use super::{DischargeError, DischargeResult, DischargeStore};
use crate::models::{AdmissionStatus, DischargedPatientView};

/// What an un-discharge actually changed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RemovalOutcome {
    pub patient_id: String,
    /// A discharge summary row was deleted
    pub summary_deleted: bool,
    /// The admission was put back to ADMITTED
    pub admission_restored: bool,
}

/// Roll back a discharge.
///
/// Deleting the summary and clearing `ipd_status` must succeed; restoring the
/// admission status is best-effort and only logged on failure.
pub fn undischarge<S: DischargeStore>(
    store: &S,
    view: &DischargedPatientView,
) -> DischargeResult<RemovalOutcome> {
    let patient_id = view.patient.id.clone();

    let summary_deleted = match &view.discharge_summary {
        Some(summary) if !summary.id.is_empty() => store
            .delete_summary(&summary.id)
            .map_err(DischargeError::store)?,
        _ => false,
    };

    // Null rather than ADMITTED: the patient leaves the board without being re-admitted.
    let patient_found = store
        .clear_ipd_status(&patient_id)
        .map_err(DischargeError::store)?;
    if !patient_found {
        tracing::debug!(patient = %patient_id, "no patient row to clear, row came from an admission only");
    }

    let admission_restored = restore_admission(store, view);

    Ok(RemovalOutcome {
        patient_id,
        summary_deleted,
        admission_restored,
    })
}

fn restore_admission<S: DischargeStore>(store: &S, view: &DischargedPatientView) -> bool {
    let admission_id = match &view.admission_id {
        Some(id) => Some(id.clone()),
        None => match store.latest_discharged_admission(&view.patient.id) {
            Ok(admission) => admission.map(|a| a.id),
            Err(e) => {
                tracing::warn!(
                    patient = %view.patient.id,
                    error = %e,
                    "could not look up admission to restore"
                );
                return false;
            }
        },
    };

    let Some(admission_id) = admission_id else {
        return false;
    };

    match store.set_admission_status(&admission_id, AdmissionStatus::Admitted) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(
                admission_id = %admission_id,
                error = %e,
                "could not restore admission status"
            );
            false
        }
    }
}
