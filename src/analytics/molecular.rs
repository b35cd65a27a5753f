use std::collections::{BTreeMap, BTreeSet};

use super::response::get_response_statistics;
use super::source::ClinicalRecordSource;
use super::survival::get_survival_statistics;
use super::types::{CorrelationEntry, MolecularCorrelation, MolecularSubtype, MolecularSummary};
use crate::models::enums::{IdhStatus, MgmtStatus, WhoGrade};
use crate::models::{Cohort, Pathology};

fn subtype_of(pathology: &Pathology) -> MolecularSubtype {
    MolecularSubtype {
        idh_status: pathology.idh_status.unwrap_or(IdhStatus::Unknown),
        mgmt_status: pathology.mgmt_status.unwrap_or(MgmtStatus::Unknown),
        who_grade: pathology.who_grade.unwrap_or(WhoGrade::Unknown),
    }
}

/// Patients with pathology grouped by subtype. A patient whose pathology
/// records disagree appears in every subtype they match.
fn group_by_subtype<S: ClinicalRecordSource>(
    source: &S,
    cohort: &Cohort,
) -> Result<BTreeMap<MolecularSubtype, BTreeSet<i64>>, S::Error> {
    let mut groups: BTreeMap<MolecularSubtype, BTreeSet<i64>> = BTreeMap::new();
    for (patient, pathology) in source.patients_with_pathology(cohort)? {
        groups
            .entry(subtype_of(&pathology))
            .or_default()
            .insert(patient.id);
    }
    Ok(groups)
}

/// One correlation record per observed subtype, ordered by
/// (IDH, MGMT, grade). Each group reuses the cohort-level aggregates
/// restricted to its own patient ids.
pub fn analyze_molecular_correlations<S: ClinicalRecordSource>(
    source: &S,
    cohort: &Cohort,
) -> Result<Vec<MolecularCorrelation>, S::Error> {
    let groups = group_by_subtype(source, cohort)?;
    let mut correlations = Vec::with_capacity(groups.len());

    for (subtype, ids) in groups {
        let patient_count = ids.len();
        let subgroup = Cohort::Patients(ids);
        let survival = get_survival_statistics(source, &subgroup)?;
        let response = get_response_statistics(source, &subgroup)?;

        correlations.push(MolecularCorrelation {
            subtype,
            patient_count,
            mean_survival_days: survival.overall_survival.mean_days,
            median_survival_days: survival.overall_survival.median_days,
            progression_rate: survival.progression_rate,
            treatment_response_rate: response.overall_response_rate(),
        });
    }

    tracing::debug!(groups = correlations.len(), "molecular correlations analyzed");
    Ok(correlations)
}

/// Builds the marginal distributions from a correlation list.
pub fn summarize_correlations(correlations: &[MolecularCorrelation]) -> MolecularSummary {
    let mut idh_distribution = BTreeMap::new();
    let mut mgmt_distribution = BTreeMap::new();
    let mut grade_distribution = BTreeMap::new();

    for c in correlations {
        *idh_distribution.entry(c.subtype.idh_status).or_insert(0) += c.patient_count;
        *mgmt_distribution.entry(c.subtype.mgmt_status).or_insert(0) += c.patient_count;
        *grade_distribution.entry(c.subtype.who_grade).or_insert(0) += c.patient_count;
    }

    MolecularSummary {
        total_patients_with_molecular_data: correlations.iter().map(|c| c.patient_count).sum(),
        idh_distribution,
        mgmt_distribution,
        grade_distribution,
        correlations: correlations
            .iter()
            .map(|c| CorrelationEntry {
                combination: c.subtype.label(),
                patient_count: c.patient_count,
                mean_survival_days: c.mean_survival_days,
                median_survival_days: c.median_survival_days,
                progression_rate: c.progression_rate,
                response_rate: c.treatment_response_rate,
            })
            .collect(),
    }
}

pub fn get_molecular_summary<S: ClinicalRecordSource>(
    source: &S,
    cohort: &Cohort,
) -> Result<MolecularSummary, S::Error> {
    let correlations = analyze_molecular_correlations(source, cohort)?;
    Ok(summarize_correlations(&correlations))
}
