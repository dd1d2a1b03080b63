//! SQLite schema definition.

/// Complete database schema for the hospital desk.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,                    -- human-readable, not unique across imports
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    gender TEXT,
    blood_group TEXT,
    ipd_status TEXT,                             -- 'DISCHARGED' or NULL
    total_spent REAL,
    visit_count INTEGER,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_patient_id ON patients(patient_id);
CREATE INDEX IF NOT EXISTS idx_patients_ipd_status ON patients(ipd_status);

-- ============================================================================
-- Admissions
-- ============================================================================

-- patient_ref carries no REFERENCES clause: legacy imports hold orphans.
CREATE TABLE IF NOT EXISTS admissions (
    id TEXT PRIMARY KEY,
    patient_ref TEXT NOT NULL,
    bed_id TEXT,
    admission_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'ADMITTED' CHECK (status IN ('ADMITTED', 'DISCHARGED')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_admissions_patient ON admissions(patient_ref);
CREATE INDEX IF NOT EXISTS idx_admissions_status ON admissions(status);

-- ============================================================================
-- Discharge Summaries
-- ============================================================================

CREATE TABLE IF NOT EXISTS discharge_summaries (
    id TEXT PRIMARY KEY,
    admission_id TEXT NOT NULL,
    patient_ref TEXT NOT NULL,
    discharge_date TEXT,
    final_diagnosis TEXT,
    consultant TEXT,
    chief_complaint TEXT,
    hospital_course TEXT,
    condition_at_discharge TEXT,
    discharge_advice TEXT,
    follow_up TEXT,
    bill_total REAL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_summaries_admission ON discharge_summaries(admission_id);
CREATE INDEX IF NOT EXISTS idx_summaries_patient ON discharge_summaries(patient_ref);
"#;
