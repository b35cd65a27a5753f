use chrono::NaiveDate;

use super::source::ClinicalRecordSource;
use super::stats::{rate, summarize_durations};
use super::types::{SurvivalMetrics, SurvivalStatistics};
use crate::models::enums::ImagingResponse;
use crate::models::{Cohort, FollowUpVisit, Patient, VisitOrder};

/// Derives one patient's survival timeline from their visits (any order).
pub fn derive_survival_metrics(patient: &Patient, visits: &[FollowUpVisit]) -> SurvivalMetrics {
    let last_follow_up = visits.iter().map(|v| v.visit_date).max();
    let progression = visits
        .iter()
        .filter(|v| v.imaging_response == Some(ImagingResponse::ProgressiveDisease))
        .map(|v| v.visit_date)
        .min();
    metrics_from_observations(patient, last_follow_up, progression)
}

fn metrics_from_observations(
    patient: &Patient,
    last_follow_up: Option<NaiveDate>,
    progression: Option<NaiveDate>,
) -> SurvivalMetrics {
    let diagnosis = patient.initial_diagnosis_date;
    let days_since_diagnosis =
        |to: Option<NaiveDate>| diagnosis.zip(to).map(|(from, to)| (to - from).num_days());

    let time_to_progression = days_since_diagnosis(progression);
    // No death date is recorded, so survival runs to the last observation.
    let overall_survival = days_since_diagnosis(last_follow_up);

    SurvivalMetrics {
        patient_id: patient.id,
        medical_record_number: patient.medical_record_number.clone(),
        diagnosis_date: diagnosis,
        last_follow_up_date: last_follow_up,
        progression_date: progression,
        death_date: None,
        time_to_progression_days: time_to_progression,
        overall_survival_days: overall_survival,
        progression_free_survival_days: time_to_progression.or(overall_survival),
        is_alive: true,
        has_progressed: progression.is_some(),
    }
}

/// Survival timeline for every patient in the cohort, in patient-id order.
pub fn calculate_survival_metrics<S: ClinicalRecordSource>(
    source: &S,
    cohort: &Cohort,
) -> Result<Vec<SurvivalMetrics>, S::Error> {
    let patients = source.patients(cohort)?;
    let mut metrics = Vec::with_capacity(patients.len());

    for patient in &patients {
        let last_follow_up = source
            .follow_ups(patient.id, VisitOrder::Descending)?
            .first()
            .map(|v| v.visit_date);
        let progression = source
            .follow_ups_with_response(patient.id, ImagingResponse::ProgressiveDisease)?
            .iter()
            .map(|v| v.visit_date)
            .min();
        metrics.push(metrics_from_observations(patient, last_follow_up, progression));
    }

    tracing::debug!(patients = metrics.len(), "survival metrics calculated");
    Ok(metrics)
}

pub fn summarize_survival(metrics: &[SurvivalMetrics]) -> SurvivalStatistics {
    let total = metrics.len();
    let progressed = metrics.iter().filter(|m| m.has_progressed).count();

    SurvivalStatistics {
        total_patients: total,
        alive_patients: metrics.iter().filter(|m| m.is_alive).count(),
        progressed_patients: progressed,
        progression_rate: rate(progressed, total),
        time_to_progression: summarize_durations(metrics.iter().map(|m| m.time_to_progression_days)),
        overall_survival: summarize_durations(metrics.iter().map(|m| m.overall_survival_days)),
        progression_free_survival: summarize_durations(
            metrics.iter().map(|m| m.progression_free_survival_days),
        ),
    }
}

pub fn get_survival_statistics<S: ClinicalRecordSource>(
    source: &S,
    cohort: &Cohort,
) -> Result<SurvivalStatistics, S::Error> {
    let metrics = calculate_survival_metrics(source, cohort)?;
    Ok(summarize_survival(&metrics))
}
