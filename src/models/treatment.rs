use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{TreatmentStatus, TreatmentType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: i64,
    pub patient_id: i64,
    pub treatment_type: TreatmentType,
    pub start_date: NaiveDate,
    /// Open-ended while the course is still running.
    pub end_date: Option<NaiveDate>,
    pub regimen: Option<String>,
    pub cycles_planned: Option<i32>,
    pub cycles_delivered: Option<i32>,
    pub treatment_status: TreatmentStatus,
    pub notes: Option<String>,
}

impl Treatment {
    /// Whether `date` falls inside the course window (inclusive on both ends).
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }
}
