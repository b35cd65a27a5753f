use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;
use crate::models::enums::*;

use super::{parse_date, parse_opt_date, CohortClause};

pub fn insert_treatment(conn: &Connection, treatment: &Treatment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO treatments (id, patient_id, treatment_type, start_date, end_date, regimen,
         cycles_planned, cycles_delivered, treatment_status, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            treatment.id,
            treatment.patient_id,
            treatment.treatment_type.as_str(),
            treatment.start_date.to_string(),
            treatment.end_date.map(|d| d.to_string()),
            treatment.regimen,
            treatment.cycles_planned,
            treatment.cycles_delivered,
            treatment.treatment_status.as_str(),
            treatment.notes,
        ],
    )?;
    Ok(())
}

/// Treatment courses whose patient belongs to the cohort, ordered by id.
pub fn get_treatments(conn: &Connection, cohort: &Cohort) -> Result<Vec<Treatment>, DatabaseError> {
    let clause = CohortClause::new("patient_id", cohort);
    let sql = format!(
        "SELECT id, patient_id, treatment_type, start_date, end_date, regimen,
                cycles_planned, cycles_delivered, treatment_status, notes
         FROM treatments WHERE 1=1{} ORDER BY id",
        clause.sql_suffix()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(clause.param_refs().as_slice(), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
            row.get::<_, Option<i32>>(6)?,
            row.get::<_, Option<i32>>(7)?,
            row.get::<_, String>(8)?,
            row.get::<_, Option<String>>(9)?,
        ))
    })?;

    treatment_rows_to_vec(rows)
}

type TreatmentRow = (
    i64, i64, String, String, Option<String>, Option<String>,
    Option<i32>, Option<i32>, String, Option<String>,
);

fn treatment_rows_to_vec(
    rows: rusqlite::MappedRows<'_, impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<TreatmentRow>>,
) -> Result<Vec<Treatment>, DatabaseError> {
    let mut treatments = Vec::new();
    for row in rows {
        let (
            id, patient_id, treatment_type, start_date, end_date, regimen,
            cycles_planned, cycles_delivered, status, notes,
        ) = row?;
        treatments.push(Treatment {
            id,
            patient_id,
            treatment_type: TreatmentType::from_str(&treatment_type)?,
            start_date: parse_date(&start_date)?,
            end_date: parse_opt_date(end_date)?,
            regimen,
            cycles_planned,
            cycles_delivered,
            treatment_status: TreatmentStatus::from_str(&status)?,
            notes,
        });
    }
    Ok(treatments)
}
