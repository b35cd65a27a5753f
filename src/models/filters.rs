use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{IdhStatus, MgmtStatus, WhoGrade};

/// Report-screen criteria that narrow the patients-with-pathology set.
/// Every `None` criterion is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CohortFilter {
    pub idh_status: Option<IdhStatus>,
    pub mgmt_status: Option<MgmtStatus>,
    pub who_grade: Option<WhoGrade>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub surgery_date_start: Option<NaiveDate>,
    pub surgery_date_end: Option<NaiveDate>,
}

impl CohortFilter {
    pub fn has_surgery_window(&self) -> bool {
        self.surgery_date_start.is_some() || self.surgery_date_end.is_some()
    }
}
