use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::Gender;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub medical_record_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    /// Anchor for every survival duration. Absent on incomplete intake.
    pub initial_diagnosis_date: Option<NaiveDate>,
    pub primary_location: Option<String>,
    pub referring_physician: Option<String>,
    pub notes: Option<String>,
}

impl Patient {
    /// Age in whole years on `on`.
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        on.years_since(self.date_of_birth)
    }
}
