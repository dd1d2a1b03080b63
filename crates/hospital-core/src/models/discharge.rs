//! Discharge summary and discharged-patient view models.

use serde::{Deserialize, Serialize};

use super::patient::PatientRecord;
use super::timestamp::parse_timestamp;

/// Diagnosis shown when no discharge summary supplies one.
pub const DIAGNOSIS_NOT_SPECIFIED: &str = "Not specified";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Billing total attached to a discharge summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DischargeBilling {
    pub total_amount: f64,
}

/// Clinical closing note for an admission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DischargeSummary {
    /// Unique summary ID
    pub id: String,
    /// Admission this summary closes
    pub admission_id: String,
    /// Patient the admission belongs to
    pub patient_ref: String,
    /// Actual discharge timestamp
    pub discharge_date: Option<String>,
    pub final_diagnosis: Option<String>,
    /// Consultant in charge
    pub consultant: Option<String>,
    pub chief_complaint: Option<String>,
    pub hospital_course: Option<String>,
    pub condition_at_discharge: Option<String>,
    pub discharge_advice: Option<String>,
    pub follow_up: Option<String>,
    pub billing: Option<DischargeBilling>,
    /// Creation timestamp
    pub created_at: String,
}

impl DischargeSummary {
    /// Create a new summary for an admission, discharged now.
    pub fn new(admission_id: String, patient_ref: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            admission_id,
            patient_ref,
            discharge_date: Some(now.clone()),
            created_at: now,
            ..Self::default()
        }
    }

    pub fn bill_total(&self) -> Option<f64> {
        self.billing.as_ref().map(|b| b.total_amount)
    }

    /// Non-blank final diagnosis, if any.
    pub fn diagnosis(&self) -> Option<&str> {
        self.final_diagnosis
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Display-only row on the discharge board. Rebuilt on every refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DischargedPatientView {
    #[serde(flatten)]
    pub patient: PatientRecord,
    /// Admission the row was derived from, when it came from an admission
    pub admission_id: Option<String>,
    pub discharge_date: Option<String>,
    pub discharge_summary: Option<DischargeSummary>,
    /// Human string such as "5 days"
    pub admission_duration: Option<String>,
    pub final_diagnosis: String,
    pub total_bill_amount: f64,
}

impl DischargedPatientView {
    /// Row with every enrichment field at its fallback value.
    pub fn bare(patient: PatientRecord) -> Self {
        Self {
            patient,
            admission_id: None,
            discharge_date: None,
            discharge_summary: None,
            admission_duration: None,
            final_diagnosis: DIAGNOSIS_NOT_SPECIFIED.to_string(),
            total_bill_amount: 0.0,
        }
    }

    /// Leading integer of the duration string, 0 when missing or unparsable.
    pub fn duration_days(&self) -> i64 {
        self.admission_duration
            .as_deref()
            .and_then(leading_integer)
            .unwrap_or(0)
    }
}

/// Whole days between two timestamps, rounded up.
///
/// Returns `None` when either side fails to parse.
pub fn admission_days(admitted_at: &str, discharged_at: &str) -> Option<i64> {
    let start = parse_timestamp(admitted_at)?;
    let end = parse_timestamp(discharged_at)?;
    let millis = (end - start).num_milliseconds();
    Some(ceil_div(millis, MILLIS_PER_DAY))
}

/// "1 day" for exactly one, "<N> days" otherwise.
pub fn format_duration(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    if numerator % denominator > 0 {
        quotient + 1
    } else {
        quotient
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_pluralization() {
        assert_eq!(format_duration(0), "0 days");
        assert_eq!(format_duration(1), "1 day");
        assert_eq!(format_duration(2), "2 days");
        assert_eq!(format_duration(14), "14 days");
    }

    #[test]
    fn test_admission_days_ceiling() {
        assert_eq!(admission_days("2024-01-01", "2024-01-06"), Some(5));
        assert_eq!(
            admission_days("2024-01-01T00:00:00Z", "2024-01-01T06:00:00Z"),
            Some(1)
        );
        assert_eq!(
            admission_days("2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z"),
            Some(0)
        );
        assert_eq!(admission_days("2024-01-01", "garbage"), None);
    }

    #[test]
    fn test_ceil_div_negative_span() {
        // Discharge recorded before admission: rounds toward zero, never below.
        assert_eq!(ceil_div(-MILLIS_PER_DAY / 2, MILLIS_PER_DAY), 0);
        assert_eq!(ceil_div(-3 * MILLIS_PER_DAY, MILLIS_PER_DAY), -3);
    }

    #[test]
    fn test_duration_days_parsing() {
        let mut view = DischargedPatientView::bare(PatientRecord::placeholder("p1"));
        assert_eq!(view.duration_days(), 0);

        view.admission_duration = Some("12 days".into());
        assert_eq!(view.duration_days(), 12);

        view.admission_duration = Some("N/A".into());
        assert_eq!(view.duration_days(), 0);
    }

    #[test]
    fn test_bare_view_defaults() {
        let view = DischargedPatientView::bare(PatientRecord::placeholder("p1"));
        assert_eq!(view.final_diagnosis, "Not specified");
        assert_eq!(view.total_bill_amount, 0.0);
        assert!(view.discharge_summary.is_none());
    }

    #[test]
    fn test_summary_diagnosis_ignores_blank() {
        let mut summary = DischargeSummary::new("a1".into(), "p1".into());
        summary.final_diagnosis = Some("   ".into());
        assert_eq!(summary.diagnosis(), None);
        summary.final_diagnosis = Some("Dengue fever".into());
        assert_eq!(summary.diagnosis(), Some("Dengue fever"));
    }
}
