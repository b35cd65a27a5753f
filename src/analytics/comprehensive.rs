use super::molecular::get_molecular_summary;
use super::response::get_response_statistics;
use super::source::ClinicalRecordSource;
use super::survival::get_survival_statistics;
use super::types::ComprehensiveAnalytics;
use crate::models::Cohort;

/// Runs all three analyzers over the same cohort.
///
/// Cohort size is the number of distinct requested ids, or the store's
/// patient count when the cohort is `All`. Requested ids with no matching
/// patient still count.
pub fn generate_comprehensive_analytics<S: ClinicalRecordSource>(
    source: &S,
    cohort: &Cohort,
) -> Result<ComprehensiveAnalytics, S::Error> {
    let survival_analysis = get_survival_statistics(source, cohort)?;
    let treatment_response = get_response_statistics(source, cohort)?;
    let molecular_correlations = get_molecular_summary(source, cohort)?;

    let patient_cohort_size = match cohort.ids() {
        Some(ids) => ids.len() as u64,
        None => source.count_patients()?,
    };

    tracing::debug!(
        cohort_size = patient_cohort_size,
        assessed_courses = treatment_response.total_treatments,
        "comprehensive analytics generated"
    );

    Ok(ComprehensiveAnalytics {
        survival_analysis,
        treatment_response,
        molecular_correlations,
        patient_cohort_size,
    })
}
