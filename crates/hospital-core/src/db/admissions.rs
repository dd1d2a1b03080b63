//! Admission database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::patients::{patient_from_row, PATIENT_COLUMNS};
use super::{Database, DbError, DbResult};
use crate::models::{AdmissionRecord, AdmissionStatus, PatientRecord};

const ADMISSION_COLUMNS: &str =
    "a.id, a.patient_ref, a.bed_id, a.admission_date, a.status, a.updated_at";

impl Database {
    /// Insert a new admission. Any embedded patient is ignored.
    pub fn insert_admission(&self, admission: &AdmissionRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO admissions (
                id, patient_ref, bed_id, admission_date, status, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                admission.id,
                admission.patient_ref,
                admission.bed_id,
                admission.admission_date,
                admission.status.as_str(),
                admission.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get an admission by ID, joined to its patient.
    pub fn get_admission(&self, id: &str) -> DbResult<Option<AdmissionRecord>> {
        let sql = format!(
            "SELECT {}, {} FROM admissions a LEFT JOIN patients p ON p.id = a.patient_ref WHERE a.id = ?",
            ADMISSION_COLUMNS, PATIENT_COLUMNS
        );
        self.conn
            .query_row(&sql, [id], admission_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Admissions with a given status, joined to their patients, newest update first.
    pub fn list_admissions_by_status(
        &self,
        status: AdmissionStatus,
    ) -> DbResult<Vec<AdmissionRecord>> {
        let sql = format!(
            "SELECT {}, {} FROM admissions a LEFT JOIN patients p ON p.id = a.patient_ref \
             WHERE a.status = ? ORDER BY a.updated_at DESC",
            ADMISSION_COLUMNS, PATIENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([status.as_str()], admission_row)?;

        let mut admissions = Vec::new();
        for row in rows {
            admissions.push(row?.try_into()?);
        }
        Ok(admissions)
    }

    /// Most recently updated admission of a patient with the given status.
    pub fn latest_admission_for_patient(
        &self,
        patient_ref: &str,
        status: AdmissionStatus,
    ) -> DbResult<Option<AdmissionRecord>> {
        let sql = format!(
            "SELECT {}, {} FROM admissions a LEFT JOIN patients p ON p.id = a.patient_ref \
             WHERE a.patient_ref = ? AND a.status = ? ORDER BY a.updated_at DESC LIMIT 1",
            ADMISSION_COLUMNS, PATIENT_COLUMNS
        );
        self.conn
            .query_row(&sql, params![patient_ref, status.as_str()], admission_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Change an admission's status.
    pub fn set_admission_status(&self, id: &str, status: AdmissionStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE admissions SET status = ?, updated_at = datetime('now') WHERE id = ?",
            params![status.as_str(), id],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Internal row type for admission queries.
struct AdmissionRow {
    id: String,
    patient_ref: String,
    bed_id: Option<String>,
    admission_date: String,
    status: String,
    updated_at: String,
    patient: Option<PatientRecord>,
}

fn admission_row(row: &Row<'_>) -> rusqlite::Result<AdmissionRow> {
    // The LEFT JOIN yields NULL patient columns for orphaned admissions.
    let joined_id: Option<String> = row.get(6)?;
    let patient = match joined_id {
        Some(_) => Some(patient_from_row(row, 6)?),
        None => None,
    };

    Ok(AdmissionRow {
        id: row.get(0)?,
        patient_ref: row.get(1)?,
        bed_id: row.get(2)?,
        admission_date: row.get(3)?,
        status: row.get(4)?,
        updated_at: row.get(5)?,
        patient,
    })
}

impl TryFrom<AdmissionRow> for AdmissionRecord {
    type Error = DbError;

    fn try_from(row: AdmissionRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<AdmissionStatus>()
            .map_err(DbError::InvalidValue)?;

        Ok(AdmissionRecord {
            id: row.id,
            patient_ref: row.patient_ref,
            patient: row.patient,
            bed_id: row.bed_id,
            admission_date: row.admission_date,
            status,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get_with_join() {
        let db = setup_db();

        let patient = PatientRecord::new("PID1".into(), "Asha".into(), "Rao".into());
        db.insert_patient(&patient).unwrap();

        let admission = AdmissionRecord::new(patient.id.clone(), Some("B-4".into()));
        db.insert_admission(&admission).unwrap();

        let retrieved = db.get_admission(&admission.id).unwrap().unwrap();
        assert_eq!(retrieved.bed_id, Some("B-4".into()));
        assert_eq!(retrieved.status, AdmissionStatus::Admitted);
        assert_eq!(retrieved.patient, Some(patient));
    }

    #[test]
    fn test_orphan_admission_has_no_patient() {
        let db = setup_db();

        let admission = AdmissionRecord::new("ghost".into(), None);
        db.insert_admission(&admission).unwrap();

        let retrieved = db.get_admission(&admission.id).unwrap().unwrap();
        assert_eq!(retrieved.patient_ref, "ghost");
        assert!(retrieved.patient.is_none());
    }

    #[test]
    fn test_list_by_status() {
        let db = setup_db();

        let mut discharged = AdmissionRecord::new("p1".into(), None);
        discharged.status = AdmissionStatus::Discharged;
        db.insert_admission(&discharged).unwrap();
        db.insert_admission(&AdmissionRecord::new("p2".into(), None))
            .unwrap();

        let list = db
            .list_admissions_by_status(AdmissionStatus::Discharged)
            .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, discharged.id);
    }

    #[test]
    fn test_set_status_and_latest() {
        let db = setup_db();

        let admission = AdmissionRecord::new("p1".into(), None);
        db.insert_admission(&admission).unwrap();
        assert!(db
            .latest_admission_for_patient("p1", AdmissionStatus::Discharged)
            .unwrap()
            .is_none());

        assert!(db
            .set_admission_status(&admission.id, AdmissionStatus::Discharged)
            .unwrap());

        let latest = db
            .latest_admission_for_patient("p1", AdmissionStatus::Discharged)
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, admission.id);
        assert!(latest.is_discharged());
    }
}
