use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;
use crate::models::enums::*;

use super::{parse_date, CohortClause};

pub fn insert_surgery(conn: &Connection, surgery: &Surgery) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO surgeries (id, patient_id, surgery_date, surgery_type, surgeon_name,
         hospital, tumor_location, extent_of_resection, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            surgery.id,
            surgery.patient_id,
            surgery.surgery_date.to_string(),
            surgery.surgery_type.as_str(),
            surgery.surgeon_name,
            surgery.hospital,
            surgery.tumor_location,
            surgery.extent_of_resection,
            surgery.notes,
        ],
    )?;
    Ok(())
}

/// Surgeries of every patient in the cohort, oldest first.
pub fn get_surgeries(conn: &Connection, cohort: &Cohort) -> Result<Vec<Surgery>, DatabaseError> {
    let clause = CohortClause::new("patient_id", cohort);
    let sql = format!(
        "SELECT id, patient_id, surgery_date, surgery_type, surgeon_name,
                hospital, tumor_location, extent_of_resection, notes
         FROM surgeries WHERE 1=1{} ORDER BY surgery_date ASC, id ASC",
        clause.sql_suffix()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(clause.param_refs().as_slice(), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, Option<String>>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, Option<String>>(7)?,
            row.get::<_, Option<String>>(8)?,
        ))
    })?;

    let mut surgeries = Vec::new();
    for row in rows {
        let (id, patient_id, date, surgery_type, surgeon_name, hospital, location, extent, notes) =
            row?;
        surgeries.push(Surgery {
            id,
            patient_id,
            surgery_date: parse_date(&date)?,
            surgery_type: SurgeryType::from_str(&surgery_type)?,
            surgeon_name,
            hospital,
            tumor_location: location,
            extent_of_resection: extent,
            notes,
        });
    }
    Ok(surgeries)
}
