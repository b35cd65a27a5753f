//! Test cohort shared by the analytics and API tests.
//!
//! Four patients:
//! - 1: IDH mutant / MGMT methylated / IV. PR on 2024-02-01, PD on 2024-06-01.
//! - 2: IDH mutant / MGMT methylated / IV. SD then CR, never progresses.
//! - 3: IDH wildtype / MGMT unmethylated / IV. PD on 2024-05-01.
//! - 4: no pathology, no diagnosis date, no visits.

use chrono::NaiveDate;
use rusqlite::Connection;

use super::source::RecordSet;
use crate::db::{self, DatabaseError};
use crate::models::enums::*;
use crate::models::*;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn patient(id: i64, born: NaiveDate, diagnosed: Option<NaiveDate>) -> Patient {
    Patient {
        id,
        medical_record_number: format!("GBM-{id:04}"),
        first_name: "Test".into(),
        last_name: format!("Patient{id}"),
        date_of_birth: born,
        gender: Gender::Unknown,
        initial_diagnosis_date: diagnosed,
        primary_location: None,
        referring_physician: None,
        notes: None,
    }
}

pub fn visit(id: i64, patient_id: i64, on: NaiveDate, response: Option<ImagingResponse>) -> FollowUpVisit {
    FollowUpVisit {
        id,
        patient_id,
        visit_date: on,
        visit_type: Some("imaging".into()),
        kps_score: Some(80),
        ecog_score: Some(EcogScore::Score1),
        neurological_status: Some(NeurologicalStatus::Stable),
        steroid_dose_mg: None,
        imaging_response: response,
        notes: None,
    }
}

pub fn treatment(
    id: i64,
    patient_id: i64,
    kind: TreatmentType,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Treatment {
    Treatment {
        id,
        patient_id,
        treatment_type: kind,
        start_date: start,
        end_date: end,
        regimen: None,
        cycles_planned: None,
        cycles_delivered: None,
        treatment_status: if end.is_some() {
            TreatmentStatus::Completed
        } else {
            TreatmentStatus::Active
        },
        notes: None,
    }
}

pub fn pathology(
    id: i64,
    patient_id: i64,
    idh: Option<IdhStatus>,
    mgmt: Option<MgmtStatus>,
    grade: Option<WhoGrade>,
) -> Pathology {
    Pathology {
        id,
        patient_id,
        surgery_id: None,
        specimen_date: date(2024, 1, 1),
        histologic_diagnosis: "Glioblastoma".into(),
        who_grade: grade,
        idh_status: idh,
        mgmt_status: mgmt,
        atrx_status: None,
        codeletion_1p19q_status: None,
        ki67_index: None,
        notes: None,
    }
}

pub fn surgery(id: i64, patient_id: i64, on: NaiveDate) -> Surgery {
    Surgery {
        id,
        patient_id,
        surgery_date: on,
        surgery_type: SurgeryType::SubtotalResection,
        surgeon_name: "Dr. Lindqvist".into(),
        hospital: None,
        tumor_location: None,
        extent_of_resection: None,
        notes: None,
    }
}

pub fn sample_records() -> RecordSet {
    use IdhStatus::*;
    use ImagingResponse::*;
    use MgmtStatus::*;

    RecordSet {
        patients: vec![
            patient(1, date(1965, 4, 12), Some(date(2024, 1, 1))),
            patient(2, date(1980, 1, 1), Some(date(2023, 6, 1))),
            patient(3, date(1950, 3, 3), Some(date(2024, 2, 1))),
            patient(4, date(1990, 7, 7), None),
        ],
        surgeries: vec![
            surgery(1, 1, date(2024, 1, 10)),
            surgery(2, 2, date(2023, 6, 15)),
            surgery(3, 3, date(2024, 2, 10)),
        ],
        pathologies: vec![
            pathology(1, 1, Some(Mutant), Some(Methylated), Some(WhoGrade::GradeIV)),
            pathology(2, 2, Some(Mutant), Some(Methylated), Some(WhoGrade::GradeIV)),
            pathology(3, 3, Some(Wildtype), Some(Unmethylated), Some(WhoGrade::GradeIV)),
        ],
        treatments: vec![
            treatment(10, 1, TreatmentType::Chemotherapy, date(2024, 1, 1), Some(date(2024, 12, 31))),
            treatment(11, 2, TreatmentType::Radiation, date(2023, 7, 1), Some(date(2023, 8, 15))),
            treatment(12, 2, TreatmentType::Immunotherapy, date(2023, 8, 20), None),
            treatment(13, 3, TreatmentType::Radiation, date(2024, 2, 15), Some(date(2024, 4, 30))),
            treatment(14, 3, TreatmentType::Chemotherapy, date(2024, 5, 1), Some(date(2024, 10, 1))),
        ],
        follow_ups: vec![
            visit(1, 1, date(2024, 2, 1), Some(PartialResponse)),
            visit(2, 1, date(2024, 6, 1), Some(ProgressiveDisease)),
            visit(3, 2, date(2023, 9, 1), Some(StableDisease)),
            visit(4, 2, date(2024, 3, 1), Some(CompleteResponse)),
            visit(5, 3, date(2024, 5, 1), Some(ProgressiveDisease)),
        ],
    }
}

/// Writes every record of `records` into a migrated database.
pub fn seed(conn: &Connection, records: &RecordSet) -> Result<(), DatabaseError> {
    for p in &records.patients {
        db::insert_patient(conn, p)?;
    }
    for s in &records.surgeries {
        db::insert_surgery(conn, s)?;
    }
    for p in &records.pathologies {
        db::insert_pathology(conn, p)?;
    }
    for t in &records.treatments {
        db::insert_treatment(conn, t)?;
    }
    for v in &records.follow_ups {
        db::insert_follow_up(conn, v)?;
    }
    Ok(())
}

pub fn sample_database() -> Connection {
    let conn = db::open_memory_database().unwrap();
    seed(&conn, &sample_records()).unwrap();
    conn
}
