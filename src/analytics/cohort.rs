use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::comprehensive::generate_comprehensive_analytics;
use super::source::ClinicalRecordSource;
use super::types::CohortReport;
use crate::models::{Cohort, CohortFilter, Pathology, Patient};

/// Patients selected by a `CohortFilter`, with the criteria that were active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCohort {
    pub cohort: Cohort,
    pub filters_applied: Vec<String>,
}

impl ResolvedCohort {
    pub fn patient_ids(&self) -> Vec<i64> {
        self.cohort
            .ids()
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Human-readable labels for the active criteria, in a fixed order.
pub fn describe_filter(filter: &CohortFilter) -> Vec<String> {
    let mut labels = Vec::new();
    if let Some(idh) = filter.idh_status {
        labels.push(format!("IDH: {idh}"));
    }
    if let Some(mgmt) = filter.mgmt_status {
        labels.push(format!("MGMT: {mgmt}"));
    }
    if let Some(grade) = filter.who_grade {
        labels.push(format!("WHO Grade: {grade}"));
    }
    if let Some(min) = filter.age_min {
        labels.push(format!("Age >= {min}"));
    }
    if let Some(max) = filter.age_max {
        labels.push(format!("Age <= {max}"));
    }
    if let Some(start) = filter.surgery_date_start {
        labels.push(format!("Surgery from {start}"));
    }
    if let Some(end) = filter.surgery_date_end {
        labels.push(format!("Surgery until {end}"));
    }
    labels
}

fn matches_markers(filter: &CohortFilter, pathology: &Pathology) -> bool {
    filter.idh_status.map_or(true, |s| pathology.idh_status == Some(s))
        && filter.mgmt_status.map_or(true, |s| pathology.mgmt_status == Some(s))
        && filter.who_grade.map_or(true, |g| pathology.who_grade == Some(g))
}

fn matches_age(filter: &CohortFilter, patient: &Patient, reference_date: NaiveDate) -> bool {
    if filter.age_min.is_none() && filter.age_max.is_none() {
        return true;
    }
    match patient.age_on(reference_date) {
        Some(age) => {
            filter.age_min.map_or(true, |min| age >= min)
                && filter.age_max.map_or(true, |max| age <= max)
        }
        None => false,
    }
}

fn in_surgery_window(filter: &CohortFilter, on: NaiveDate) -> bool {
    filter.surgery_date_start.map_or(true, |start| on >= start)
        && filter.surgery_date_end.map_or(true, |end| on <= end)
}

/// Resolves the filter to an explicit patient set.
///
/// Only patients with at least one pathology record are candidates. Marker
/// criteria must hold on one pathology record; ages are whole years on
/// `reference_date`; a surgery window needs one surgery inside it. The
/// result is always an explicit `Cohort::Patients`, possibly empty.
pub fn resolve_cohort<S: ClinicalRecordSource>(
    source: &S,
    filter: &CohortFilter,
    reference_date: NaiveDate,
) -> Result<ResolvedCohort, S::Error> {
    let mut selected: BTreeSet<i64> = source
        .patients_with_pathology(&Cohort::All)?
        .into_iter()
        .filter(|(patient, pathology)| {
            matches_markers(filter, pathology) && matches_age(filter, patient, reference_date)
        })
        .map(|(patient, _)| patient.id)
        .collect();

    if filter.has_surgery_window() {
        let operated: BTreeSet<i64> = source
            .surgeries(&Cohort::Patients(selected.clone()))?
            .into_iter()
            .filter(|s| in_surgery_window(filter, s.surgery_date))
            .map(|s| s.patient_id)
            .collect();
        selected.retain(|id| operated.contains(id));
    }

    let filters_applied = describe_filter(filter);
    tracing::debug!(
        matched = selected.len(),
        criteria = filters_applied.len(),
        "cohort resolved"
    );

    Ok(ResolvedCohort {
        cohort: Cohort::Patients(selected),
        filters_applied,
    })
}

/// Resolves the filter and runs the comprehensive analytics on the result.
pub fn build_cohort_report<S: ClinicalRecordSource>(
    source: &S,
    filter: &CohortFilter,
    reference_date: NaiveDate,
) -> Result<CohortReport, S::Error> {
    let resolved = resolve_cohort(source, filter, reference_date)?;
    let analytics = generate_comprehensive_analytics(source, &resolved.cohort)?;
    Ok(CohortReport {
        patient_ids: resolved.patient_ids(),
        filters_applied: resolved.filters_applied,
        analytics,
    })
}
