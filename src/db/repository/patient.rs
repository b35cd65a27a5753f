use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;
use crate::models::enums::*;

use super::{parse_date, parse_opt_date, CohortClause};

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, medical_record_number, first_name, last_name, date_of_birth,
         gender, initial_diagnosis_date, primary_location, referring_physician, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            patient.id,
            patient.medical_record_number,
            patient.first_name,
            patient.last_name,
            patient.date_of_birth.to_string(),
            patient.gender.as_str(),
            patient.initial_diagnosis_date.map(|d| d.to_string()),
            patient.primary_location,
            patient.referring_physician,
            patient.notes,
        ],
    )?;
    Ok(())
}

/// Patients in the cohort, ordered by id.
pub fn get_patients(conn: &Connection, cohort: &Cohort) -> Result<Vec<Patient>, DatabaseError> {
    let clause = CohortClause::new("id", cohort);
    let sql = format!(
        "SELECT id, medical_record_number, first_name, last_name, date_of_birth, gender,
                initial_diagnosis_date, primary_location, referring_physician, notes
         FROM patients WHERE 1=1{} ORDER BY id",
        clause.sql_suffix()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(clause.param_refs().as_slice(), |row| {
        Ok((
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
        ))
    })?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

pub fn count_patients(conn: &Connection) -> Result<u64, DatabaseError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count as u64)
}

pub(super) type PatientRow = (
    i64, String, String, String, String, String,
    Option<String>, Option<String>, Option<String>, Option<String>,
);

pub(super) fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    let (
        id, mrn, first_name, last_name, date_of_birth, gender,
        diagnosis_date, primary_location, referring_physician, notes,
    ) = row;
    Ok(Patient {
        id,
        medical_record_number: mrn,
        first_name,
        last_name,
        date_of_birth: parse_date(&date_of_birth)?,
        gender: Gender::from_str(&gender)?,
        initial_diagnosis_date: parse_opt_date(diagnosis_date)?,
        primary_location,
        referring_physician,
        notes,
    })
}
