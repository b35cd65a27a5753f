use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

use super::patient::patient_from_row;
use super::{parse_date, parse_opt_enum, CohortClause};

pub fn insert_pathology(conn: &Connection, pathology: &Pathology) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO pathologies (id, patient_id, surgery_id, specimen_date, histologic_diagnosis,
         who_grade, idh_status, mgmt_status, atrx_status, codeletion_1p19q_status, ki67_index, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            pathology.id,
            pathology.patient_id,
            pathology.surgery_id,
            pathology.specimen_date.to_string(),
            pathology.histologic_diagnosis,
            pathology.who_grade.map(|g| g.as_str()),
            pathology.idh_status.map(|s| s.as_str()),
            pathology.mgmt_status.map(|s| s.as_str()),
            pathology.atrx_status.map(|s| s.as_str()),
            pathology.codeletion_1p19q_status.map(|s| s.as_str()),
            pathology.ki67_index,
            pathology.notes,
        ],
    )?;
    Ok(())
}

/// Inner join of patients and their pathology records. A patient with two
/// pathology reports appears twice; a patient with none does not appear.
pub fn get_patients_with_pathology(
    conn: &Connection,
    cohort: &Cohort,
) -> Result<Vec<(Patient, Pathology)>, DatabaseError> {
    let clause = CohortClause::new("p.id", cohort);
    let sql = format!(
        "SELECT p.id, p.medical_record_number, p.first_name, p.last_name, p.date_of_birth,
                p.gender, p.initial_diagnosis_date, p.primary_location, p.referring_physician,
                p.notes,
                pa.id, pa.surgery_id, pa.specimen_date, pa.histologic_diagnosis, pa.who_grade,
                pa.idh_status, pa.mgmt_status, pa.atrx_status, pa.codeletion_1p19q_status,
                pa.ki67_index, pa.notes
         FROM patients p
         JOIN pathologies pa ON pa.patient_id = p.id
         WHERE 1=1{}
         ORDER BY p.id, pa.id",
        clause.sql_suffix()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(clause.param_refs().as_slice(), |row| {
        let patient = (
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, Option<String>>(7)?,
            row.get::<_, Option<String>>(8)?,
            row.get::<_, Option<String>>(9)?,
        );
        let pathology = PathologyRow {
            id: row.get(10)?,
            surgery_id: row.get(11)?,
            specimen_date: row.get(12)?,
            histologic_diagnosis: row.get(13)?,
            who_grade: row.get(14)?,
            idh_status: row.get(15)?,
            mgmt_status: row.get(16)?,
            atrx_status: row.get(17)?,
            codeletion_1p19q_status: row.get(18)?,
            ki67_index: row.get(19)?,
            notes: row.get(20)?,
        };
        Ok((patient, pathology))
    })?;

    let mut joined = Vec::new();
    for row in rows {
        let (patient_row, pathology_row) = row?;
        let patient = patient_from_row(patient_row)?;
        let pathology = pathology_row.into_pathology(patient.id)?;
        joined.push((patient, pathology));
    }
    Ok(joined)
}

struct PathologyRow {
    id: i64,
    surgery_id: Option<i64>,
    specimen_date: String,
    histologic_diagnosis: String,
    who_grade: Option<String>,
    idh_status: Option<String>,
    mgmt_status: Option<String>,
    atrx_status: Option<String>,
    codeletion_1p19q_status: Option<String>,
    ki67_index: Option<i32>,
    notes: Option<String>,
}

impl PathologyRow {
    fn into_pathology(self, patient_id: i64) -> Result<Pathology, DatabaseError> {
        Ok(Pathology {
            id: self.id,
            patient_id,
            surgery_id: self.surgery_id,
            specimen_date: parse_date(&self.specimen_date)?,
            histologic_diagnosis: self.histologic_diagnosis,
            who_grade: parse_opt_enum(self.who_grade)?,
            idh_status: parse_opt_enum(self.idh_status)?,
            mgmt_status: parse_opt_enum(self.mgmt_status)?,
            atrx_status: parse_opt_enum(self.atrx_status)?,
            codeletion_1p19q_status: parse_opt_enum(self.codeletion_1p19q_status)?,
            ki67_index: self.ki67_index,
            notes: self.notes,
        })
    }
}
