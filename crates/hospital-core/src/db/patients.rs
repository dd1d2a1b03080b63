//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{PatientRecord, IPD_STATUS_DISCHARGED};

/// Column list matching [`patient_from_row`], for a table aliased `p`.
pub(super) const PATIENT_COLUMNS: &str = "p.id, p.patient_id, p.first_name, p.last_name, p.phone, \
     p.gender, p.blood_group, p.ipd_status, p.total_spent, p.visit_count, \
     p.created_at, p.updated_at";

/// Read a patient from `row` starting at column `offset`.
pub(super) fn patient_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<PatientRecord> {
    Ok(PatientRecord {
        id: row.get(offset)?,
        patient_id: row.get(offset + 1)?,
        first_name: row.get(offset + 2)?,
        last_name: row.get(offset + 3)?,
        phone: row.get(offset + 4)?,
        gender: row.get(offset + 5)?,
        blood_group: row.get(offset + 6)?,
        ipd_status: row.get(offset + 7)?,
        total_spent: row.get(offset + 8)?,
        visit_count: row.get(offset + 9)?,
        created_at: row.get(offset + 10)?,
        updated_at: row.get(offset + 11)?,
    })
}

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &PatientRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, patient_id, first_name, last_name, phone, gender, blood_group,
                ipd_status, total_spent, visit_count, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                patient.id,
                patient.patient_id,
                patient.first_name,
                patient.last_name,
                patient.phone,
                patient.gender,
                patient.blood_group,
                patient.ipd_status,
                patient.total_spent,
                patient.visit_count,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing patient's demographics and aggregates.
    pub fn update_patient(&self, patient: &PatientRecord) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                patient_id = ?2,
                first_name = ?3,
                last_name = ?4,
                phone = ?5,
                gender = ?6,
                blood_group = ?7,
                ipd_status = ?8,
                total_spent = ?9,
                visit_count = ?10,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.patient_id,
                patient.first_name,
                patient.last_name,
                patient.phone,
                patient.gender,
                patient.blood_group,
                patient.ipd_status,
                patient.total_spent,
                patient.visit_count,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by primary key.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<PatientRecord>> {
        let sql = format!("SELECT {} FROM patients p WHERE p.id = ?", PATIENT_COLUMNS);
        self.conn
            .query_row(&sql, [id], |row| patient_from_row(row, 0))
            .optional()
            .map_err(Into::into)
    }

    /// Patients whose `ipd_status` marks them discharged, newest update first.
    pub fn list_discharged_patients(&self, limit: usize) -> DbResult<Vec<PatientRecord>> {
        let sql = format!(
            "SELECT {} FROM patients p WHERE p.ipd_status = ? ORDER BY p.updated_at DESC LIMIT ?",
            PATIENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![IPD_STATUS_DISCHARGED, limit as i64], |row| {
            patient_from_row(row, 0)
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Set or clear a patient's `ipd_status`.
    pub fn set_patient_ipd_status(&self, id: &str, status: Option<&str>) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE patients SET ipd_status = ?, updated_at = datetime('now') WHERE id = ?",
            params![status, id],
        )?;
        Ok(rows_affected > 0)
    }
}
