//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per clinical entity. Inserts exist for importers and
//! tests; reads are the narrow set the analytics engine consumes.

mod follow_up;
mod pathology;
mod patient;
mod surgery;
mod treatment;

use std::rc::Rc;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::vtab::array::Array;

use super::DatabaseError;
use crate::models::Cohort;

pub use follow_up::*;
pub use pathology::*;
pub use patient::*;
pub use surgery::*;
pub use treatment::*;

/// Helper: builds the `AND col IN rarray(?1)` suffix for a cohort
/// restriction. The id set is bound as a single array parameter, so cohort
/// size is not capped by SQLite's host-parameter limit. `Cohort::All` adds
/// nothing; an empty explicit cohort matches no rows.
pub(crate) struct CohortClause {
    clause: String,
    params: Vec<Box<dyn rusqlite::types::ToSql>>,
}

impl CohortClause {
    pub(crate) fn new(id_column: &str, cohort: &Cohort) -> Self {
        match cohort.ids() {
            None => Self {
                clause: String::new(),
                params: Vec::new(),
            },
            Some(ids) if ids.is_empty() => Self {
                clause: " AND 0".to_string(),
                params: Vec::new(),
            },
            Some(ids) => {
                let values: Array = Rc::new(ids.iter().copied().map(Value::from).collect());
                Self {
                    clause: format!(" AND {id_column} IN rarray(?1)"),
                    params: vec![Box::new(values)],
                }
            }
        }
    }

    pub(crate) fn sql_suffix(&self) -> &str {
        &self.clause
    }

    pub(crate) fn param_refs(&self) -> Vec<&dyn rusqlite::types::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DatabaseError::ConstraintViolation(format!("invalid date '{value}': {e}")))
}

pub(crate) fn parse_opt_date(value: Option<String>) -> Result<Option<NaiveDate>, DatabaseError> {
    value.as_deref().map(parse_date).transpose()
}

pub(crate) fn parse_opt_enum<T>(value: Option<String>) -> Result<Option<T>, DatabaseError>
where
    T: FromStr<Err = DatabaseError>,
{
    value.as_deref().map(T::from_str).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::*;
    use crate::models::enums::*;
    use rusqlite::{params, Connection};

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_patient(conn: &Connection, id: i64, diagnosis: Option<NaiveDate>) {
        insert_patient(conn, &Patient {
            id,
            medical_record_number: format!("MRN-{id:04}"),
            first_name: "Test".into(),
            last_name: format!("Patient{id}"),
            date_of_birth: date(1965, 4, 12),
            gender: Gender::Female,
            initial_diagnosis_date: diagnosis,
            primary_location: Some("Right temporal lobe".into()),
            referring_physician: None,
            notes: None,
        }).unwrap();
    }

    fn make_visit(conn: &Connection, id: i64, patient_id: i64, on: NaiveDate, resp: Option<ImagingResponse>) {
        insert_follow_up(conn, &FollowUpVisit {
            id,
            patient_id,
            visit_date: on,
            visit_type: Some("routine".into()),
            kps_score: Some(80),
            ecog_score: Some(EcogScore::Score1),
            neurological_status: Some(NeurologicalStatus::Stable),
            steroid_dose_mg: Some(4.0),
            imaging_response: resp,
            notes: None,
        }).unwrap();
    }

    #[test]
    fn patient_insert_and_retrieve() {
        let conn = test_db();
        make_patient(&conn, 1, Some(date(2024, 1, 1)));

        let found = get_patients(&conn, &Cohort::from_ids([1])).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].medical_record_number, "MRN-0001");
        assert_eq!(found[0].gender, Gender::Female);
        assert_eq!(found[0].initial_diagnosis_date, Some(date(2024, 1, 1)));
        assert!(get_patients(&conn, &Cohort::from_ids([99])).unwrap().is_empty());
    }

    #[test]
    fn cohort_larger_than_parameter_limit() {
        let conn = test_db();
        let tx = conn.unchecked_transaction().unwrap();
        for id in 1..=40_000 {
            make_patient(&tx, id, None);
        }
        tx.commit().unwrap();

        let even = Cohort::from_ids((1..=80_000).filter(|id| id % 2 == 0));
        let found = get_patients(&conn, &even).unwrap();
        assert_eq!(found.len(), 20_000);
        assert_eq!(found.first().map(|p| p.id), Some(2));
        assert_eq!(found.last().map(|p| p.id), Some(40_000));
    }

    #[test]
    fn patients_filtered_by_cohort() {
        let conn = test_db();
        for id in 1..=4 {
            make_patient(&conn, id, None);
        }

        assert_eq!(get_patients(&conn, &Cohort::All).unwrap().len(), 4);
        let subset = get_patients(&conn, &Cohort::from_ids([2, 4, 7])).unwrap();
        let ids: Vec<i64> = subset.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(get_patients(&conn, &Cohort::from_ids(Vec::new())).unwrap().is_empty());
        assert_eq!(count_patients(&conn).unwrap(), 4);
    }

    #[test]
    fn follow_ups_sorted_both_directions() {
        let conn = test_db();
        make_patient(&conn, 1, None);
        make_visit(&conn, 1, 1, date(2024, 6, 1), None);
        make_visit(&conn, 2, 1, date(2024, 2, 1), None);
        make_visit(&conn, 3, 1, date(2024, 4, 1), None);

        let asc = get_follow_ups_for_patient(&conn, 1, VisitOrder::Ascending).unwrap();
        let asc_dates: Vec<NaiveDate> = asc.iter().map(|v| v.visit_date).collect();
        assert_eq!(asc_dates, vec![date(2024, 2, 1), date(2024, 4, 1), date(2024, 6, 1)]);

        let desc = get_follow_ups_for_patient(&conn, 1, VisitOrder::Descending).unwrap();
        assert_eq!(desc[0].visit_date, date(2024, 6, 1));
        assert_eq!(desc[0].ecog_score, Some(EcogScore::Score1));
    }

    #[test]
    fn follow_ups_filtered_by_response() {
        let conn = test_db();
        make_patient(&conn, 1, None);
        make_visit(&conn, 1, 1, date(2024, 8, 1), Some(ImagingResponse::ProgressiveDisease));
        make_visit(&conn, 2, 1, date(2024, 3, 1), Some(ImagingResponse::StableDisease));
        make_visit(&conn, 3, 1, date(2024, 5, 1), Some(ImagingResponse::ProgressiveDisease));

        let pd = get_follow_ups_by_response(&conn, 1, ImagingResponse::ProgressiveDisease).unwrap();
        assert_eq!(pd.len(), 2);
        assert_eq!(pd[0].visit_date, date(2024, 5, 1));
    }

    #[test]
    fn treatments_scoped_to_cohort_patients() {
        let conn = test_db();
        make_patient(&conn, 1, None);
        make_patient(&conn, 2, None);
        for (id, patient_id) in [(10, 1), (11, 2), (12, 2)] {
            insert_treatment(&conn, &Treatment {
                id,
                patient_id,
                treatment_type: TreatmentType::Chemotherapy,
                start_date: date(2024, 1, 1),
                end_date: None,
                regimen: Some("Temozolomide".into()),
                cycles_planned: Some(6),
                cycles_delivered: None,
                treatment_status: TreatmentStatus::Active,
                notes: None,
            }).unwrap();
        }

        assert_eq!(get_treatments(&conn, &Cohort::All).unwrap().len(), 3);
        let only_two = get_treatments(&conn, &Cohort::from_ids([2])).unwrap();
        assert_eq!(only_two.len(), 2);
        assert!(only_two.iter().all(|t| t.patient_id == 2));
        assert_eq!(only_two[0].end_date, None);
    }

    #[test]
    fn pathology_join_excludes_patients_without_pathology() {
        let conn = test_db();
        make_patient(&conn, 1, None);
        make_patient(&conn, 2, None);
        insert_pathology(&conn, &Pathology {
            id: 1,
            patient_id: 1,
            surgery_id: None,
            specimen_date: date(2024, 1, 5),
            histologic_diagnosis: "Glioblastoma".into(),
            who_grade: Some(WhoGrade::GradeIV),
            idh_status: Some(IdhStatus::Wildtype),
            mgmt_status: None,
            atrx_status: Some(AtrxStatus::Retained),
            codeletion_1p19q_status: None,
            ki67_index: Some(30),
            notes: None,
        }).unwrap();

        let joined = get_patients_with_pathology(&conn, &Cohort::All).unwrap();
        assert_eq!(joined.len(), 1);
        let (patient, pathology) = &joined[0];
        assert_eq!(patient.id, 1);
        assert_eq!(pathology.who_grade, Some(WhoGrade::GradeIV));
        assert_eq!(pathology.mgmt_status, None);
    }

    #[test]
    fn surgeries_ordered_by_date() {
        let conn = test_db();
        make_patient(&conn, 1, None);
        for (id, on) in [(1, date(2024, 3, 1)), (2, date(2023, 12, 1))] {
            insert_surgery(&conn, &Surgery {
                id,
                patient_id: 1,
                surgery_date: on,
                surgery_type: SurgeryType::GrossTotalResection,
                surgeon_name: "Dr. Okafor".into(),
                hospital: None,
                tumor_location: None,
                extent_of_resection: Some(">95%".into()),
                notes: None,
            }).unwrap();
        }

        let surgeries = get_surgeries(&conn, &Cohort::All).unwrap();
        assert_eq!(surgeries[0].surgery_date, date(2023, 12, 1));
    }

    #[test]
    fn foreign_key_constraint_enforced() {
        let conn = test_db();
        let result = conn.execute(
            "INSERT INTO follow_up_visits (id, patient_id, visit_date) VALUES (1, 404, '2024-01-01')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn cascade_delete_removes_visits() {
        let conn = test_db();
        make_patient(&conn, 1, None);
        make_visit(&conn, 1, 1, date(2024, 1, 1), None);
        conn.execute("DELETE FROM patients WHERE id = ?1", params![1]).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM follow_up_visits", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn malformed_date_surfaces_as_constraint_violation() {
        let conn = test_db();
        conn.execute(
            "INSERT INTO patients (id, medical_record_number, first_name, last_name, date_of_birth, gender)
             VALUES (1, 'MRN-1', 'A', 'B', '12/01/1960', 'male')",
            [],
        )
        .unwrap();

        let err = get_patients(&conn, &Cohort::All).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }
}
