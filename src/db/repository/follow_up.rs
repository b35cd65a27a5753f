use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;
use crate::models::enums::*;

use super::{parse_date, parse_opt_enum};

const FOLLOW_UP_COLUMNS: &str = "id, patient_id, visit_date, visit_type, kps_score, ecog_score,
     neurological_status, steroid_dose_mg, imaging_response, notes";

pub fn insert_follow_up(conn: &Connection, visit: &FollowUpVisit) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO follow_up_visits (id, patient_id, visit_date, visit_type, kps_score,
         ecog_score, neurological_status, steroid_dose_mg, imaging_response, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            visit.id,
            visit.patient_id,
            visit.visit_date.to_string(),
            visit.visit_type,
            visit.kps_score,
            visit.ecog_score.map(|s| s.as_str()),
            visit.neurological_status.map(|s| s.as_str()),
            visit.steroid_dose_mg,
            visit.imaging_response.map(|r| r.as_str()),
            visit.notes,
        ],
    )?;
    Ok(())
}

/// All visits of one patient sorted by visit date. Same-day visits keep id order.
pub fn get_follow_ups_for_patient(
    conn: &Connection,
    patient_id: i64,
    order: VisitOrder,
) -> Result<Vec<FollowUpVisit>, DatabaseError> {
    let sql = format!(
        "SELECT {FOLLOW_UP_COLUMNS} FROM follow_up_visits
         WHERE patient_id = ?1 ORDER BY visit_date {dir}, id {dir}",
        dir = order.sql()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![patient_id], read_follow_up_row)?;
    follow_up_rows_to_vec(rows)
}

/// Visits of one patient carrying the given imaging response, oldest first.
pub fn get_follow_ups_by_response(
    conn: &Connection,
    patient_id: i64,
    response: ImagingResponse,
) -> Result<Vec<FollowUpVisit>, DatabaseError> {
    let sql = format!(
        "SELECT {FOLLOW_UP_COLUMNS} FROM follow_up_visits
         WHERE patient_id = ?1 AND imaging_response = ?2
         ORDER BY visit_date ASC, id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![patient_id, response.as_str()], read_follow_up_row)?;
    follow_up_rows_to_vec(rows)
}

struct FollowUpRow {
    id: i64,
    patient_id: i64,
    visit_date: String,
    visit_type: Option<String>,
    kps_score: Option<i32>,
    ecog_score: Option<String>,
    neurological_status: Option<String>,
    steroid_dose_mg: Option<f64>,
    imaging_response: Option<String>,
    notes: Option<String>,
}

fn read_follow_up_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FollowUpRow> {
    Ok(FollowUpRow {
        id: row.get("id")?,
        patient_id: row.get("patient_id")?,
        visit_date: row.get("visit_date")?,
        visit_type: row.get("visit_type")?,
        kps_score: row.get("kps_score")?,
        ecog_score: row.get("ecog_score")?,
        neurological_status: row.get("neurological_status")?,
        steroid_dose_mg: row.get("steroid_dose_mg")?,
        imaging_response: row.get("imaging_response")?,
        notes: row.get("notes")?,
    })
}

fn follow_up_rows_to_vec(
    rows: rusqlite::MappedRows<'_, impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<FollowUpRow>>,
) -> Result<Vec<FollowUpVisit>, DatabaseError> {
    let mut visits = Vec::new();
    for row in rows {
        let row = row?;
        visits.push(FollowUpVisit {
            id: row.id,
            patient_id: row.patient_id,
            visit_date: parse_date(&row.visit_date)?,
            visit_type: row.visit_type,
            kps_score: row.kps_score,
            ecog_score: parse_opt_enum::<EcogScore>(row.ecog_score)?,
            neurological_status: parse_opt_enum::<NeurologicalStatus>(row.neurological_status)?,
            steroid_dose_mg: row.steroid_dose_mg,
            imaging_response: parse_opt_enum::<ImagingResponse>(row.imaging_response)?,
            notes: row.notes,
        });
    }
    Ok(visits)
}
