use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::enums::{IdhStatus, ImagingResponse, MgmtStatus, TreatmentType, WhoGrade};

/// Per-patient survival timeline.
///
/// There is no death date in the record model, so `is_alive` is always true
/// and `overall_survival_days` measures survival to last observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalMetrics {
    pub patient_id: i64,
    pub medical_record_number: String,
    pub diagnosis_date: Option<NaiveDate>,
    pub last_follow_up_date: Option<NaiveDate>,
    pub progression_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub time_to_progression_days: Option<i64>,
    pub overall_survival_days: Option<i64>,
    pub progression_free_survival_days: Option<i64>,
    pub is_alive: bool,
    pub has_progressed: bool,
}

/// Mean/median over the non-absent values of one duration metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationSummary {
    pub mean_days: Option<f64>,
    pub median_days: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalStatistics {
    pub total_patients: usize,
    pub alive_patients: usize,
    pub progressed_patients: usize,
    pub progression_rate: f64,
    pub time_to_progression: DurationSummary,
    pub overall_survival: DurationSummary,
    pub progression_free_survival: DurationSummary,
}

/// Outcome of one treatment course, derived from the imaging assessments
/// recorded while the course was running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentResponse {
    pub patient_id: i64,
    pub treatment_id: i64,
    pub treatment_type: TreatmentType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub best_response: ImagingResponse,
    pub time_to_response_days: Option<i64>,
    pub duration_of_response_days: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseDistribution {
    pub complete_response: usize,
    pub partial_response: usize,
    pub stable_disease: usize,
    pub progressive_disease: usize,
}

impl ResponseDistribution {
    pub fn record(&mut self, response: ImagingResponse) {
        match response {
            ImagingResponse::CompleteResponse => self.complete_response += 1,
            ImagingResponse::PartialResponse => self.partial_response += 1,
            ImagingResponse::StableDisease => self.stable_disease += 1,
            ImagingResponse::ProgressiveDisease => self.progressive_disease += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.complete_response + self.partial_response + self.stable_disease + self.progressive_disease
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentTypeResponse {
    pub count: usize,
    pub response_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseBreakdown {
    pub overall_response_rate: f64,
    pub disease_control_rate: f64,
    pub response_distribution: ResponseDistribution,
    pub by_treatment_type: BTreeMap<TreatmentType, TreatmentTypeResponse>,
}

/// Cohort response statistics. When no course has a derivable response the
/// breakdown is absent and the value serializes as `{"total_treatments": 0}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseStatistics {
    pub total_treatments: usize,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ResponseBreakdown>,
}

impl ResponseStatistics {
    pub fn empty() -> Self {
        Self {
            total_treatments: 0,
            breakdown: None,
        }
    }

    /// Objective response rate, 0 for the empty shape.
    pub fn overall_response_rate(&self) -> f64 {
        self.breakdown
            .as_ref()
            .map_or(0.0, |b| b.overall_response_rate)
    }
}

/// Grouping key: one molecular subtype. Missing markers collapse to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MolecularSubtype {
    pub idh_status: IdhStatus,
    pub mgmt_status: MgmtStatus,
    pub who_grade: WhoGrade,
}

impl MolecularSubtype {
    pub fn label(&self) -> String {
        format!(
            "IDH-{}/MGMT-{}/Grade-{}",
            self.idh_status, self.mgmt_status, self.who_grade
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolecularCorrelation {
    #[serde(flatten)]
    pub subtype: MolecularSubtype,
    pub patient_count: usize,
    pub mean_survival_days: Option<f64>,
    pub median_survival_days: Option<f64>,
    pub progression_rate: f64,
    pub treatment_response_rate: f64,
}

/// One row of the summary table, keyed by its printable combination label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub combination: String,
    pub patient_count: usize,
    pub mean_survival_days: Option<f64>,
    pub median_survival_days: Option<f64>,
    pub progression_rate: f64,
    pub response_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolecularSummary {
    pub total_patients_with_molecular_data: usize,
    pub idh_distribution: BTreeMap<IdhStatus, usize>,
    pub mgmt_distribution: BTreeMap<MgmtStatus, usize>,
    pub grade_distribution: BTreeMap<WhoGrade, usize>,
    pub correlations: Vec<CorrelationEntry>,
}

/// Combined report: the three analyzers over one cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveAnalytics {
    pub survival_analysis: SurvivalStatistics,
    pub treatment_response: ResponseStatistics,
    pub molecular_correlations: MolecularSummary,
    pub patient_cohort_size: u64,
}

/// Patients selected by a report filter plus the labels of the criteria used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortReport {
    pub filters_applied: Vec<String>,
    pub patient_ids: Vec<i64>,
    pub analytics: ComprehensiveAnalytics,
}
