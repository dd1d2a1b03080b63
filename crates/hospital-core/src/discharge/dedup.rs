//! Candidate-key deduplication of discharged-patient rows.
//!
//! Each row yields an ordered list of identity keys. A row survives only if
//! none of its keys was claimed by an earlier survivor; survivors claim all
//! of their keys.

use std::collections::HashSet;

use crate::models::{DischargedPatientView, PLACEHOLDER_FIRST_NAME, PLACEHOLDER_LAST_NAME};

/// Extracts one identity signal from a row, `None` when the signal is absent.
pub type KeyExtractor = fn(&DischargedPatientView) -> Option<String>;

/// Identity signals in priority order; the first present one is the primary key.
pub const CANDIDATE_KEYS: &[KeyExtractor] = &[internal_id_key, readable_id_key, name_phone_key];

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Primary key of the patient record.
pub fn internal_id_key(view: &DischargedPatientView) -> Option<String> {
    non_blank(&view.patient.id)
}

/// Human-readable patient ID.
pub fn readable_id_key(view: &DischargedPatientView) -> Option<String> {
    non_blank(&view.patient.patient_id)
}

/// `first-last-phone`, lowercased. Blank parts stay blank in the key.
///
/// Absent when all three parts are blank, and for the synthesized
/// "Unknown Patient" identity, which names no one.
pub fn name_phone_key(view: &DischargedPatientView) -> Option<String> {
    let first = view.patient.first_name.trim();
    let last = view.patient.last_name.trim();
    let phone = view.patient.phone.trim();
    if first.is_empty() && last.is_empty() && phone.is_empty() {
        return None;
    }
    if first == PLACEHOLDER_FIRST_NAME && last == PLACEHOLDER_LAST_NAME {
        return None;
    }
    Some(format!("{}-{}-{}", first, last, phone).to_lowercase())
}

/// All present identity keys of a row, in priority order.
pub fn candidate_keys(view: &DischargedPatientView) -> Vec<String> {
    CANDIDATE_KEYS
        .iter()
        .filter_map(|extract| extract(view))
        .collect()
}

/// First present identity key of a row.
pub fn primary_key(view: &DischargedPatientView) -> Option<String> {
    CANDIDATE_KEYS.iter().find_map(|extract| extract(view))
}

/// Result of a dedup pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    pub kept: Vec<DischargedPatientView>,
    pub dropped: usize,
}

/// Keep the first row per identity, rejecting any row that shares a key with a kept one.
///
/// Rows with no keys at all cannot collide and are always kept.
pub fn dedup_by_candidate_keys(records: Vec<DischargedPatientView>) -> DedupOutcome {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for record in records {
        let keys = candidate_keys(&record);
        if keys.iter().any(|key| claimed.contains(key)) {
            tracing::debug!(
                primary_key = ?primary_key(&record),
                "dropping duplicate discharged patient"
            );
            dropped += 1;
            continue;
        }
        claimed.extend(keys);
        kept.push(record);
    }

    DedupOutcome { kept, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientRecord;

    fn row(id: &str, patient_id: &str, first: &str, last: &str, phone: &str) -> DischargedPatientView {
        DischargedPatientView::bare(PatientRecord {
            id: id.into(),
            patient_id: patient_id.into(),
            first_name: first.into(),
            last_name: last.into(),
            phone: phone.into(),
            ..PatientRecord::default()
        })
    }

    #[test]
    fn test_candidate_keys_order() {
        let view = row("p1", "PID1", "Asha", "Rao", "98765");
        assert_eq!(
            candidate_keys(&view),
            vec!["p1".to_string(), "PID1".to_string(), "asha-rao-98765".to_string()]
        );
        assert_eq!(primary_key(&view), Some("p1".to_string()));
    }

    #[test]
    fn test_empty_candidates_filtered() {
        let view = row("", "PID1", "", "", "");
        assert_eq!(candidate_keys(&view), vec!["PID1".to_string()]);
        assert_eq!(primary_key(&view), Some("PID1".to_string()));
    }

    #[test]
    fn test_name_key_keeps_blank_phone() {
        let view = row("", "PID1", "Asha", "Rao", "");
        assert_eq!(
            candidate_keys(&view),
            vec!["PID1".to_string(), "asha-rao-".to_string()]
        );
    }

    #[test]
    fn test_split_ids_without_phone_collide() {
        let a = row("p9", "", "Kiran", "Das", "");
        let b = row("", "PID9", "Kiran", "Das", "");
        let outcome = dedup_by_candidate_keys(vec![a, b]);
        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.kept[0].patient.id, "p9");
    }

    #[test]
    fn test_drops_on_any_shared_key() {
        let records = vec![
            row("p1", "PID1", "Asha", "Rao", "98765"),
            row("p2", "PID1", "Other", "Name", ""),
            row("p3", "PID3", "ASHA", "rao", "98765"),
            row("p4", "PID4", "Meera", "Nair", ""),
        ];

        let outcome = dedup_by_candidate_keys(records);
        assert_eq!(outcome.dropped, 2);
        let ids: Vec<_> = outcome.kept.iter().map(|v| v.patient.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p4"]);
    }

    #[test]
    fn test_claims_all_keys_not_just_primary() {
        // X claims {A, B}; Y's only key is B.
        let x = row("A", "B", "", "", "");
        let y = row("", "B", "", "", "");
        let outcome = dedup_by_candidate_keys(vec![x, y]);
        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.dropped, 1);
    }

    #[test]
    fn test_crossed_ids_collide() {
        let a = row("p1", "PID1", "", "", "");
        let b = row("PID9", "p1", "", "", "");
        let outcome = dedup_by_candidate_keys(vec![a, b]);
        assert_eq!(outcome.kept.len(), 1);
    }

    #[test]
    fn test_placeholder_identity_has_no_name_key() {
        let a = row("10", "10", "Unknown", "Patient", "");
        let b = row("11", "11", "Unknown", "Patient", "");
        assert_eq!(name_phone_key(&a), None);
        let outcome = dedup_by_candidate_keys(vec![a, b]);
        assert_eq!(outcome.kept.len(), 2);
    }

    #[test]
    fn test_same_name_without_phone_is_one_patient() {
        let a = row("p1", "PID1", "Asha", "Rao", "");
        let b = row("p2", "PID2", "asha", "RAO", "");
        let outcome = dedup_by_candidate_keys(vec![a, b]);
        assert_eq!(outcome.kept.len(), 1);
    }

    #[test]
    fn test_keyless_rows_kept() {
        let outcome = dedup_by_candidate_keys(vec![row("", "", "", "", ""), row("", "", "", "", "")]);
        assert_eq!(outcome.kept.len(), 2);
        assert_eq!(outcome.dropped, 0);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let records = vec![
            row("p1", "PID1", "Asha", "Rao", "1"),
            row("p1", "PID2", "Asha", "Rao", "2"),
            row("p3", "PID3", "Asha", "Rao", "1"),
        ];
        let first = dedup_by_candidate_keys(records);
        let second = dedup_by_candidate_keys(first.kept.clone());
        assert_eq!(second.dropped, 0);
        assert_eq!(second.kept, first.kept);
    }
}
