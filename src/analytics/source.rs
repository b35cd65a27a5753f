//! Read access the analyzers need, behind one trait.
//!
//! The sqlite `Connection` is the production source. `RecordSet` holds
//! records in memory for importers and tests that should not touch disk.

use std::convert::Infallible;

use rusqlite::Connection;

use crate::db::{repository, DatabaseError};
use crate::models::enums::ImagingResponse;
use crate::models::{Cohort, FollowUpVisit, Pathology, Patient, Surgery, Treatment, VisitOrder};

/// Clinical record reads consumed by the analytics engine.
///
/// Implementations must honour the cohort restriction exactly: `Cohort::All`
/// means every patient, an explicit empty cohort means none.
pub trait ClinicalRecordSource {
    type Error;

    /// Patients in the cohort, ordered by id.
    fn patients(&self, cohort: &Cohort) -> Result<Vec<Patient>, Self::Error>;

    fn count_patients(&self) -> Result<u64, Self::Error>;

    /// All visits of one patient, by visit date in the requested order.
    fn follow_ups(&self, patient_id: i64, order: VisitOrder)
        -> Result<Vec<FollowUpVisit>, Self::Error>;

    /// Visits of one patient with the given imaging response, oldest first.
    fn follow_ups_with_response(
        &self,
        patient_id: i64,
        response: ImagingResponse,
    ) -> Result<Vec<FollowUpVisit>, Self::Error>;

    fn treatments(&self, cohort: &Cohort) -> Result<Vec<Treatment>, Self::Error>;

    /// Inner join: one pair per pathology record, patients without one are skipped.
    fn patients_with_pathology(
        &self,
        cohort: &Cohort,
    ) -> Result<Vec<(Patient, Pathology)>, Self::Error>;

    fn surgeries(&self, cohort: &Cohort) -> Result<Vec<Surgery>, Self::Error>;
}

impl ClinicalRecordSource for Connection {
    type Error = DatabaseError;

    fn patients(&self, cohort: &Cohort) -> Result<Vec<Patient>, DatabaseError> {
        repository::get_patients(self, cohort)
    }

    fn count_patients(&self) -> Result<u64, DatabaseError> {
        repository::count_patients(self)
    }

    fn follow_ups(
        &self,
        patient_id: i64,
        order: VisitOrder,
    ) -> Result<Vec<FollowUpVisit>, DatabaseError> {
        repository::get_follow_ups_for_patient(self, patient_id, order)
    }

    fn follow_ups_with_response(
        &self,
        patient_id: i64,
        response: ImagingResponse,
    ) -> Result<Vec<FollowUpVisit>, DatabaseError> {
        repository::get_follow_ups_by_response(self, patient_id, response)
    }

    fn treatments(&self, cohort: &Cohort) -> Result<Vec<Treatment>, DatabaseError> {
        repository::get_treatments(self, cohort)
    }

    fn patients_with_pathology(
        &self,
        cohort: &Cohort,
    ) -> Result<Vec<(Patient, Pathology)>, DatabaseError> {
        repository::get_patients_with_pathology(self, cohort)
    }

    fn surgeries(&self, cohort: &Cohort) -> Result<Vec<Surgery>, DatabaseError> {
        repository::get_surgeries(self, cohort)
    }
}

/// In-memory record store. Cannot fail.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub patients: Vec<Patient>,
    pub surgeries: Vec<Surgery>,
    pub pathologies: Vec<Pathology>,
    pub treatments: Vec<Treatment>,
    pub follow_ups: Vec<FollowUpVisit>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_patient(&self, id: i64) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }
}

impl ClinicalRecordSource for RecordSet {
    type Error = Infallible;

    fn patients(&self, cohort: &Cohort) -> Result<Vec<Patient>, Infallible> {
        let mut out: Vec<Patient> = self
            .patients
            .iter()
            .filter(|p| cohort.contains(p.id))
            .cloned()
            .collect();
        out.sort_by_key(|p| p.id);
        Ok(out)
    }

    fn count_patients(&self) -> Result<u64, Infallible> {
        Ok(self.patients.len() as u64)
    }

    fn follow_ups(
        &self,
        patient_id: i64,
        order: VisitOrder,
    ) -> Result<Vec<FollowUpVisit>, Infallible> {
        let mut out: Vec<FollowUpVisit> = self
            .follow_ups
            .iter()
            .filter(|v| v.patient_id == patient_id)
            .cloned()
            .collect();
        out.sort_by_key(|v| (v.visit_date, v.id));
        if order == VisitOrder::Descending {
            out.reverse();
        }
        Ok(out)
    }

    fn follow_ups_with_response(
        &self,
        patient_id: i64,
        response: ImagingResponse,
    ) -> Result<Vec<FollowUpVisit>, Infallible> {
        let mut out = self.follow_ups(patient_id, VisitOrder::Ascending)?;
        out.retain(|v| v.imaging_response == Some(response));
        Ok(out)
    }

    fn treatments(&self, cohort: &Cohort) -> Result<Vec<Treatment>, Infallible> {
        let mut out: Vec<Treatment> = self
            .treatments
            .iter()
            .filter(|t| cohort.contains(t.patient_id))
            .cloned()
            .collect();
        out.sort_by_key(|t| t.id);
        Ok(out)
    }

    fn patients_with_pathology(
        &self,
        cohort: &Cohort,
    ) -> Result<Vec<(Patient, Pathology)>, Infallible> {
        let mut pathologies: Vec<&Pathology> = self
            .pathologies
            .iter()
            .filter(|p| cohort.contains(p.patient_id))
            .collect();
        pathologies.sort_by_key(|p| (p.patient_id, p.id));

        Ok(pathologies
            .into_iter()
            .filter_map(|path| {
                self.find_patient(path.patient_id)
                    .map(|patient| (patient.clone(), path.clone()))
            })
            .collect())
    }

    fn surgeries(&self, cohort: &Cohort) -> Result<Vec<Surgery>, Infallible> {
        let mut out: Vec<Surgery> = self
            .surgeries
            .iter()
            .filter(|s| cohort.contains(s.patient_id))
            .cloned()
            .collect();
        out.sort_by_key(|s| (s.surgery_date, s.id));
        Ok(out)
    }
}
