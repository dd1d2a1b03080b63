//! Discharge summary database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{
    AdmissionStatus, DischargeBilling, DischargeSummary, IPD_STATUS_DISCHARGED,
};

const SUMMARY_COLUMNS: &str = "id, admission_id, patient_ref, discharge_date, final_diagnosis, \
     consultant, chief_complaint, hospital_course, condition_at_discharge, \
     discharge_advice, follow_up, bill_total, created_at";

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<DischargeSummary> {
    let bill_total: Option<f64> = row.get(11)?;
    Ok(DischargeSummary {
        id: row.get(0)?,
        admission_id: row.get(1)?,
        patient_ref: row.get(2)?,
        discharge_date: row.get(3)?,
        final_diagnosis: row.get(4)?,
        consultant: row.get(5)?,
        chief_complaint: row.get(6)?,
        hospital_course: row.get(7)?,
        condition_at_discharge: row.get(8)?,
        discharge_advice: row.get(9)?,
        follow_up: row.get(10)?,
        billing: bill_total.map(|total_amount| DischargeBilling { total_amount }),
        created_at: row.get(12)?,
    })
}

fn insert_summary(conn: &Connection, summary: &DischargeSummary) -> rusqlite::Result<usize> {
    conn.execute(
        r#"
        INSERT INTO discharge_summaries (
            id, admission_id, patient_ref, discharge_date, final_diagnosis,
            consultant, chief_complaint, hospital_course, condition_at_discharge,
            discharge_advice, follow_up, bill_total, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        params![
            summary.id,
            summary.admission_id,
            summary.patient_ref,
            summary.discharge_date,
            summary.final_diagnosis,
            summary.consultant,
            summary.chief_complaint,
            summary.hospital_course,
            summary.condition_at_discharge,
            summary.discharge_advice,
            summary.follow_up,
            summary.bill_total(),
            summary.created_at,
        ],
    )
}

impl Database {
    /// Insert a discharge summary.
    pub fn insert_discharge_summary(&self, summary: &DischargeSummary) -> DbResult<()> {
        insert_summary(&self.conn, summary)?;
        Ok(())
    }

    /// Summary closing an admission. The newest wins if legacy data holds several.
    pub fn get_summary_for_admission(
        &self,
        admission_id: &str,
    ) -> DbResult<Option<DischargeSummary>> {
        let sql = format!(
            "SELECT {} FROM discharge_summaries WHERE admission_id = ? \
             ORDER BY created_at DESC LIMIT 1",
            SUMMARY_COLUMNS
        );
        self.conn
            .query_row(&sql, [admission_id], summary_from_row)
            .optional()
            .map_err(Into::into)
    }

    /// All summaries for a patient, most recent discharge first.
    pub fn list_discharge_history(&self, patient_ref: &str) -> DbResult<Vec<DischargeSummary>> {
        let sql = format!(
            "SELECT {} FROM discharge_summaries WHERE patient_ref = ? \
             ORDER BY COALESCE(discharge_date, created_at) DESC",
            SUMMARY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([patient_ref], summary_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a discharge summary.
    pub fn delete_discharge_summary(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM discharge_summaries WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Discharge an admission in one transaction.
    ///
    /// Marks the admission and its patient discharged and writes the summary.
    pub fn discharge_patient(&self, summary: &DischargeSummary) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let admission_rows = tx.execute(
            "UPDATE admissions SET status = ?, updated_at = datetime('now') WHERE id = ?",
            params![AdmissionStatus::Discharged.as_str(), summary.admission_id],
        )?;
        if admission_rows == 0 {
            return Err(DbError::NotFound(format!(
                "admission {}",
                summary.admission_id
            )));
        }

        tx.execute(
            "UPDATE patients SET ipd_status = ?, updated_at = datetime('now') WHERE id = ?",
            params![IPD_STATUS_DISCHARGED, summary.patient_ref],
        )?;

        insert_summary(&tx, summary)?;

        tx.commit()?;
        Ok(())
    }
}
