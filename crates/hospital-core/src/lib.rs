//! Hospital Desk Core Library
//!
//! Local-first discharge tracking, service pricing and exports for the
//! hospital front desk.
//!
//! # Architecture
//!
//! ```text
//!   admissions (status = DISCHARGED)        patients (ipd_status = DISCHARGED)
//!              │                                         │
//!   summary by admission id                 discharge history (latest)
//!              │                                         │
//!              └──────────────► merge ◄──────────────────┘
//!                                 │
//!                      candidate-key dedup pass
//!                                 │
//!                          DischargeBoard
//!                    (search / date filter / sort)
//!                                 │
//!                 ┌───────────────┼────────────────┐
//!                 ▼               ▼                ▼
//!              Render        CSV export       Un-discharge
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite persistence for patients, admissions and discharge summaries
//! - [`models`]: Domain types (PatientRecord, AdmissionRecord, DischargeSummary, ...)
//! - [`discharge`]: Reconciliation, dedup, board view state, un-discharge
//! - [`pricing`]: Service tariff lookup for bookings
//! - [`export`]: Spreadsheet export
//! - [`config`]: Startup configuration
//! - [`logging`]: Tracing subscriber setup

pub mod config;
pub mod db;
pub mod discharge;
pub mod export;
pub mod logging;
pub mod models;
pub mod pricing;

// Re-export commonly used types
pub use config::CoreConfig;
pub use db::Database;
pub use discharge::{
    reconcile, undischarge, DateFilter, DischargeBoard, DischargeStore, ReconcileOutcome,
    SortColumn,
};
pub use models::{
    AdmissionRecord, AdmissionStatus, DischargeSummary, DischargedPatientView, PatientRecord,
};
pub use pricing::{booking_total, BookingSummary};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use models::DischargeBilling;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HospitalError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for HospitalError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => HospitalError::NotFound(what),
            other => HospitalError::DatabaseError(other.to_string()),
        }
    }
}

impl From<discharge::DischargeError> for HospitalError {
    fn from(e: discharge::DischargeError) -> Self {
        match e {
            discharge::DischargeError::NotFound(what) => HospitalError::NotFound(what),
            other => HospitalError::DatabaseError(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for HospitalError {
    fn from(e: config::ConfigError) -> Self {
        HospitalError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for HospitalError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HospitalError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the tracing subscriber. Returns false if one was already installed.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    logging::init_logging(filter.as_deref())
}

/// Open or create a database at the given path with default settings.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<HospitalCore>, HospitalError> {
    let config = CoreConfig::from_env_values(Some(path), None, None)?;
    HospitalCore::open(config)
}

/// Open a database with explicit settings; blank values use defaults.
#[uniffi::export]
pub fn open_database_with_settings(
    path: String,
    patient_scan_limit: Option<String>,
    currency_symbol: Option<String>,
) -> Result<Arc<HospitalCore>, HospitalError> {
    let config = CoreConfig::from_env_values(Some(path), patient_scan_limit, currency_symbol)?;
    HospitalCore::open(config)
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<HospitalCore>, HospitalError> {
    let db = Database::open_in_memory()?;
    let config = CoreConfig::from_env_values(Some(":memory:".into()), None, None)?;
    Ok(Arc::new(HospitalCore::with_database(db, config)))
}

/// Sum of the applicable tariff for each selected service.
#[uniffi::export]
pub fn calculate_booking_total(service_ids: Vec<String>, corporate: bool) -> f64 {
    booking_total(&service_ids, corporate)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database and discharge board for FFI.
#[derive(uniffi::Object)]
pub struct HospitalCore {
    db: Arc<Mutex<Database>>,
    board: Mutex<DischargeBoard>,
    config: CoreConfig,
}

/// Current time at the device's UTC offset, so date windows follow the local day.
fn local_now() -> chrono::DateTime<chrono::FixedOffset> {
    let now = chrono::Local::now();
    now.with_timezone(now.offset())
}

impl HospitalCore {
    fn open(config: CoreConfig) -> Result<Arc<Self>, HospitalError> {
        let db = Database::open(config.database_path())?;
        Ok(Arc::new(Self::with_database(db, config)))
    }

    fn with_database(db: Database, config: CoreConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            board: Mutex::new(DischargeBoard::new()),
            config,
        }
    }
}

#[uniffi::export]
impl HospitalCore {
    // =========================================================================
    // Patient & Admission Operations
    // =========================================================================

    /// Register a new patient.
    pub fn create_patient(
        &self,
        patient_id: String,
        first_name: String,
        last_name: String,
        phone: String,
    ) -> Result<FfiPatient, HospitalError> {
        if patient_id.trim().is_empty() {
            return Err(HospitalError::InvalidInput("patient_id cannot be empty".into()));
        }
        let db = self.db.lock()?;
        let mut patient = PatientRecord::new(patient_id, first_name, last_name);
        patient.phone = phone;
        db.insert_patient(&patient)?;
        Ok(patient.into())
    }

    /// Admit a patient to a bed.
    pub fn admit_patient(
        &self,
        patient_ref: String,
        bed_id: Option<String>,
    ) -> Result<String, HospitalError> {
        let db = self.db.lock()?;
        if db.get_patient(&patient_ref)?.is_none() {
            return Err(HospitalError::NotFound(format!("patient {}", patient_ref)));
        }
        let admission = AdmissionRecord::new(patient_ref, bed_id);
        db.insert_admission(&admission)?;
        Ok(admission.id)
    }

    /// Discharge an admission and write its summary.
    pub fn discharge_admission(
        &self,
        admission_id: String,
        final_diagnosis: Option<String>,
        consultant: Option<String>,
        bill_total: Option<f64>,
    ) -> Result<(), HospitalError> {
        let db = self.db.lock()?;
        let admission = db
            .get_admission(&admission_id)?
            .ok_or_else(|| HospitalError::NotFound(format!("admission {}", admission_id)))?;

        let mut summary = DischargeSummary::new(admission.id, admission.patient_ref);
        summary.final_diagnosis = final_diagnosis;
        summary.consultant = consultant;
        summary.billing = bill_total.map(|total_amount| DischargeBilling { total_amount });
        db.discharge_patient(&summary)?;
        Ok(())
    }

    // =========================================================================
    // Discharge Board Operations
    // =========================================================================

    /// Re-run reconciliation and replace the board contents.
    pub fn refresh_discharged(&self) -> Result<FfiReconcileSummary, HospitalError> {
        let outcome = {
            let db = self.db.lock()?;
            reconcile(&*db, self.config.patient_scan_limit())
        };
        let summary = FfiReconcileSummary::from(&outcome);

        let mut board = self.board.lock()?;
        board.replace(outcome);
        Ok(summary)
    }

    pub fn set_search(&self, query: String) -> Result<(), HospitalError> {
        self.board.lock()?.search = query;
        Ok(())
    }

    /// Set the date window: "all", "today", "week" or "month".
    pub fn set_date_filter(&self, filter: String) -> Result<(), HospitalError> {
        let filter = filter.parse::<DateFilter>().map_err(HospitalError::InvalidInput)?;
        self.board.lock()?.date_filter = filter;
        Ok(())
    }

    /// Column-header click: "name", "discharge_date", "duration" or "bill".
    pub fn click_sort(&self, column: String) -> Result<FfiSortState, HospitalError> {
        let column = column.parse::<SortColumn>().map_err(HospitalError::InvalidInput)?;
        let mut board = self.board.lock()?;
        board.click_sort(column);
        Ok(FfiSortState {
            column: format!("{:?}", board.sort.column),
            direction: board.sort.direction.to_string(),
        })
    }

    /// Board rows after search, filter and sort.
    pub fn visible_discharged(&self) -> Result<Vec<FfiDischargedPatient>, HospitalError> {
        let board = self.board.lock()?;
        Ok(board
            .visible(local_now())
            .into_iter()
            .map(FfiDischargedPatient::from)
            .collect())
    }

    /// Roll back a discharge and drop the row from the board.
    pub fn undischarge(&self, patient_id: String) -> Result<FfiRemovalOutcome, HospitalError> {
        let mut board = self.board.lock()?;
        let view = board
            .find(&patient_id)
            .cloned()
            .ok_or_else(|| HospitalError::NotFound(format!("discharged patient {}", patient_id)))?;

        let outcome = {
            let db = self.db.lock()?;
            undischarge(&*db, &view)?
        };
        board.remove_local(&patient_id);

        Ok(FfiRemovalOutcome {
            patient_id: outcome.patient_id,
            summary_deleted: outcome.summary_deleted,
            admission_restored: outcome.admission_restored,
        })
    }

    /// Export the visible board rows as CSV.
    pub fn export_discharged_csv(&self) -> Result<FfiExport, HospitalError> {
        let board = self.board.lock()?;
        let now = local_now();
        let rows = board.visible(now);
        let row_count = rows.len() as u32;
        Ok(FfiExport {
            filename: export::export_filename(now.date_naive()),
            content: export::export_discharged_csv(rows, self.config.currency_symbol()),
            row_count,
        })
    }

    // =========================================================================
    // Pricing Operations
    // =========================================================================

    /// Price a service booking.
    pub fn booking_summary(&self, service_ids: Vec<String>, corporate: bool) -> FfiBookingSummary {
        BookingSummary::build(&service_ids, corporate).into()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub ipd_status: Option<String>,
}

impl From<PatientRecord> for FfiPatient {
    fn from(patient: PatientRecord) -> Self {
        Self {
            id: patient.id,
            patient_id: patient.patient_id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            phone: patient.phone,
            ipd_status: patient.ipd_status,
        }
    }
}

/// FFI-safe discharge board row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDischargedPatient {
    pub id: String,
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Option<String>,
    pub admission_id: Option<String>,
    pub discharge_date: Option<String>,
    pub admission_duration: Option<String>,
    pub final_diagnosis: String,
    pub consultant: Option<String>,
    pub total_bill_amount: f64,
    pub has_summary: bool,
}

impl From<&DischargedPatientView> for FfiDischargedPatient {
    fn from(view: &DischargedPatientView) -> Self {
        Self {
            id: view.patient.id.clone(),
            patient_id: view.patient.patient_id.clone(),
            first_name: view.patient.first_name.clone(),
            last_name: view.patient.last_name.clone(),
            phone: view.patient.phone.clone(),
            gender: view.patient.gender.clone(),
            admission_id: view.admission_id.clone(),
            discharge_date: view.discharge_date.clone(),
            admission_duration: view.admission_duration.clone(),
            final_diagnosis: view.final_diagnosis.clone(),
            consultant: view
                .discharge_summary
                .as_ref()
                .and_then(|s| s.consultant.clone()),
            total_bill_amount: view.total_bill_amount,
            has_summary: view.discharge_summary.is_some(),
        }
    }
}

/// FFI-safe reconciliation summary (for the confirmation toast).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReconcileSummary {
    pub patient_count: u32,
    pub duplicates_removed: u32,
    pub admissions_failed: bool,
    pub patients_failed: bool,
}

impl From<&ReconcileOutcome> for FfiReconcileSummary {
    fn from(outcome: &ReconcileOutcome) -> Self {
        Self {
            patient_count: outcome.patients.len() as u32,
            duplicates_removed: outcome.duplicates_removed as u32,
            admissions_failed: outcome.admissions_failed,
            patients_failed: outcome.patients_failed,
        }
    }
}

/// FFI-safe sort state.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSortState {
    pub column: String,
    pub direction: String,
}

/// FFI-safe un-discharge result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRemovalOutcome {
    pub patient_id: String,
    pub summary_deleted: bool,
    pub admission_restored: bool,
}

/// FFI-safe export payload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExport {
    pub filename: String,
    pub content: String,
    pub row_count: u32,
}

/// FFI-safe booking line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBookingLine {
    pub service_id: String,
    pub name: String,
    pub rate: f64,
}

/// FFI-safe booking summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBookingSummary {
    pub corporate: bool,
    pub lines: Vec<FfiBookingLine>,
    pub unknown_ids: Vec<String>,
    pub total: f64,
}

impl From<BookingSummary> for FfiBookingSummary {
    fn from(summary: BookingSummary) -> Self {
        Self {
            corporate: summary.corporate,
            lines: summary
                .lines
                .into_iter()
                .map(|l| FfiBookingLine {
                    service_id: l.service_id,
                    name: l.name,
                    rate: l.rate,
                })
                .collect(),
            unknown_ids: summary.unknown_ids,
            total: summary.total,
        }
    }
}
