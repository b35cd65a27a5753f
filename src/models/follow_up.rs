use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{EcogScore, ImagingResponse, NeurologicalStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpVisit {
    pub id: i64,
    pub patient_id: i64,
    pub visit_date: NaiveDate,
    pub visit_type: Option<String>,
    /// Karnofsky performance status, 0-100.
    pub kps_score: Option<i32>,
    pub ecog_score: Option<EcogScore>,
    pub neurological_status: Option<NeurologicalStatus>,
    pub steroid_dose_mg: Option<f64>,
    pub imaging_response: Option<ImagingResponse>,
    pub notes: Option<String>,
}
