use std::collections::{BTreeMap, HashMap};

use super::source::ClinicalRecordSource;
use super::stats::rate;
use super::types::{
    ResponseBreakdown, ResponseDistribution, ResponseStatistics, TreatmentResponse,
    TreatmentTypeResponse,
};
use crate::models::enums::{ImagingResponse, TreatmentType};
use crate::models::{Cohort, FollowUpVisit, Treatment, VisitOrder};

/// Derives the response record for one course from the patient's visits.
///
/// Returns `None` when no visit inside the course window carries an imaging
/// response. The first response is the earliest non-progression assessment;
/// its duration runs to the next progression, or to the course end.
pub fn derive_treatment_response(
    treatment: &Treatment,
    visits: &[FollowUpVisit],
) -> Option<TreatmentResponse> {
    let mut assessed: Vec<(&FollowUpVisit, ImagingResponse)> = visits
        .iter()
        .filter(|v| treatment.covers(v.visit_date))
        .filter_map(|v| v.imaging_response.map(|r| (v, r)))
        .collect();
    assessed.sort_by_key(|(v, _)| (v.visit_date, v.id));

    let best_response = assessed.iter().map(|(_, r)| *r).max_by_key(|r| r.priority())?;

    let first_response = assessed
        .iter()
        .find(|(_, r)| *r != ImagingResponse::ProgressiveDisease)
        .map(|(v, _)| v.visit_date);

    let time_to_response = first_response.map(|on| (on - treatment.start_date).num_days());

    let duration_of_response = first_response.zip(treatment.end_date).map(|(from, end)| {
        let until = assessed
            .iter()
            .find(|(v, r)| *r == ImagingResponse::ProgressiveDisease && v.visit_date > from)
            .map_or(end, |(v, _)| v.visit_date);
        (until - from).num_days()
    });

    Some(TreatmentResponse {
        patient_id: treatment.patient_id,
        treatment_id: treatment.id,
        treatment_type: treatment.treatment_type,
        start_date: treatment.start_date,
        end_date: treatment.end_date,
        best_response,
        time_to_response_days: time_to_response,
        duration_of_response_days: duration_of_response,
    })
}

/// Response records for every course of the cohort's patients. Courses with
/// no in-window assessment are omitted.
pub fn analyze_treatment_responses<S: ClinicalRecordSource>(
    source: &S,
    cohort: &Cohort,
) -> Result<Vec<TreatmentResponse>, S::Error> {
    let treatments = source.treatments(cohort)?;
    let mut visits_by_patient: HashMap<i64, Vec<FollowUpVisit>> = HashMap::new();
    let mut responses = Vec::new();

    for treatment in &treatments {
        if !visits_by_patient.contains_key(&treatment.patient_id) {
            let visits = source.follow_ups(treatment.patient_id, VisitOrder::Ascending)?;
            visits_by_patient.insert(treatment.patient_id, visits);
        }
        let visits = visits_by_patient
            .get(&treatment.patient_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if let Some(response) = derive_treatment_response(treatment, visits) {
            responses.push(response);
        }
    }

    tracing::debug!(
        courses = treatments.len(),
        assessed = responses.len(),
        "treatment responses analyzed"
    );
    Ok(responses)
}

pub fn summarize_responses(responses: &[TreatmentResponse]) -> ResponseStatistics {
    if responses.is_empty() {
        return ResponseStatistics::empty();
    }

    let mut distribution = ResponseDistribution::default();
    let mut per_type: BTreeMap<TreatmentType, (usize, usize)> = BTreeMap::new();
    let mut objective = 0;
    let mut controlled = 0;

    for response in responses {
        let best = response.best_response;
        distribution.record(best);
        let entry = per_type.entry(response.treatment_type).or_default();
        entry.0 += 1;
        if best.is_objective() {
            objective += 1;
            entry.1 += 1;
        }
        if best.is_disease_control() {
            controlled += 1;
        }
    }
    let total = distribution.total();

    let by_treatment_type = per_type
        .into_iter()
        .map(|(kind, (count, objective))| {
            (
                kind,
                TreatmentTypeResponse {
                    count,
                    response_rate: rate(objective, count),
                },
            )
        })
        .collect();

    ResponseStatistics {
        total_treatments: total,
        breakdown: Some(ResponseBreakdown {
            overall_response_rate: rate(objective, total),
            disease_control_rate: rate(controlled, total),
            response_distribution: distribution,
            by_treatment_type,
        }),
    }
}

pub fn get_response_statistics<S: ClinicalRecordSource>(
    source: &S,
    cohort: &Cohort,
) -> Result<ResponseStatistics, S::Error> {
    let responses = analyze_treatment_responses(source, cohort)?;
    Ok(summarize_responses(&responses))
}
