use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::SurgeryType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surgery {
    pub id: i64,
    pub patient_id: i64,
    pub surgery_date: NaiveDate,
    pub surgery_type: SurgeryType,
    pub surgeon_name: String,
    pub hospital: Option<String>,
    pub tumor_location: Option<String>,
    pub extent_of_resection: Option<String>,
    pub notes: Option<String>,
}
