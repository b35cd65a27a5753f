use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{AtrxStatus, CodeletionStatus, IdhStatus, MgmtStatus, WhoGrade};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pathology {
    pub id: i64,
    pub patient_id: i64,
    pub surgery_id: Option<i64>,
    pub specimen_date: NaiveDate,
    pub histologic_diagnosis: String,
    pub who_grade: Option<WhoGrade>,
    pub idh_status: Option<IdhStatus>,
    pub mgmt_status: Option<MgmtStatus>,
    pub atrx_status: Option<AtrxStatus>,
    pub codeletion_1p19q_status: Option<CodeletionStatus>,
    pub ki67_index: Option<i32>,
    pub notes: Option<String>,
}
