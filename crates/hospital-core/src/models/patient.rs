//! Patient models.

use serde::{Deserialize, Serialize};

/// `ipd_status` value marking a patient as discharged from the in-patient department.
pub const IPD_STATUS_DISCHARGED: &str = "DISCHARGED";

/// First name used when an admission arrives without its patient join.
pub const PLACEHOLDER_FIRST_NAME: &str = "Unknown";

/// Last name used when an admission arrives without its patient join.
pub const PLACEHOLDER_LAST_NAME: &str = "Patient";

/// A patient record as stored by the persistence backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PatientRecord {
    /// Primary key
    pub id: String,
    /// Human-readable identifier (not unique across import sources)
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    /// Free-form status; `"DISCHARGED"` marks relevance to the discharge board
    pub ipd_status: Option<String>,
    /// Pre-aggregated spend across all visits
    pub total_spent: Option<f64>,
    /// Pre-aggregated visit count
    pub visit_count: Option<u32>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl PatientRecord {
    /// Create a new patient with required fields.
    pub fn new(patient_id: String, first_name: String, last_name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            first_name,
            last_name,
            phone: String::new(),
            gender: None,
            blood_group: None,
            ipd_status: None,
            total_spent: None,
            visit_count: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Stand-in identity for an admission whose patient join is missing.
    ///
    /// The admission's foreign key doubles as both identifiers.
    pub fn placeholder(patient_ref: &str) -> Self {
        Self {
            id: patient_ref.to_string(),
            patient_id: patient_ref.to_string(),
            first_name: PLACEHOLDER_FIRST_NAME.to_string(),
            last_name: PLACEHOLDER_LAST_NAME.to_string(),
            ..Self::default()
        }
    }

    pub fn is_discharged(&self) -> bool {
        self.ipd_status.as_deref() == Some(IPD_STATUS_DISCHARGED)
    }

    /// "First Last", trimmed when either part is blank.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
