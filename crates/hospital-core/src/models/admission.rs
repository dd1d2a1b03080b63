//! Admission models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::patient::PatientRecord;

/// Status of a single hospital stay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdmissionStatus {
    /// Patient currently occupies a bed
    Admitted,
    /// Stay has ended
    Discharged,
}

impl AdmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionStatus::Admitted => "ADMITTED",
            AdmissionStatus::Discharged => "DISCHARGED",
        }
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMITTED" => Ok(AdmissionStatus::Admitted),
            "DISCHARGED" => Ok(AdmissionStatus::Discharged),
            other => Err(format!("unknown admission status: {}", other)),
        }
    }
}

/// One continuous hospital stay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdmissionRecord {
    /// Unique admission ID
    pub id: String,
    /// Foreign key to `PatientRecord::id`
    pub patient_ref: String,
    /// Embedded patient join; absent when the join found nothing
    pub patient: Option<PatientRecord>,
    /// Bed reference
    pub bed_id: Option<String>,
    /// Admission timestamp
    pub admission_date: String,
    pub status: AdmissionStatus,
    /// Last update timestamp (doubles as a discharge-time proxy)
    pub updated_at: String,
}

impl AdmissionRecord {
    /// Admit a patient now.
    pub fn new(patient_ref: String, bed_id: Option<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_ref,
            patient: None,
            bed_id,
            admission_date: now.clone(),
            status: AdmissionStatus::Admitted,
            updated_at: now,
        }
    }

    pub fn is_discharged(&self) -> bool {
        self.status == AdmissionStatus::Discharged
    }
}
