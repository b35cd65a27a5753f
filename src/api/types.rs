//! Shared API context and query-string types.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::core_state::CoreState;
use crate::models::{Cohort, CohortFilter};

// ═══════════════════════════════════════════════════════════
// ApiContext: shared state for all routes
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Query strings
// ═══════════════════════════════════════════════════════════

/// `?patient_ids=1,2,3` on every analytics route.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub patient_ids: Option<String>,
}

impl AnalyticsQuery {
    pub fn cohort(&self) -> Result<Cohort, ApiError> {
        parse_patient_ids(self.patient_ids.as_deref())
    }
}

/// Absent or blank means every patient. Empty items between commas are
/// skipped; anything else that is not an integer is rejected.
pub fn parse_patient_ids(raw: Option<&str>) -> Result<Cohort, ApiError> {
    let mut ids = Vec::new();
    for item in raw.unwrap_or_default().split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let id = item
            .parse::<i64>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid patient id '{item}'")))?;
        ids.push(id);
    }

    if ids.is_empty() {
        Ok(Cohort::All)
    } else {
        Ok(Cohort::from_ids(ids))
    }
}

/// Report filter as sent by a form: every field optional, empty strings
/// treated as absent. `reference_date` anchors age and defaults to today.
#[derive(Debug, Default, Deserialize)]
pub struct CohortQuery {
    pub idh_status: Option<String>,
    pub mgmt_status: Option<String>,
    pub who_grade: Option<String>,
    pub age_min: Option<String>,
    pub age_max: Option<String>,
    pub surgery_date_start: Option<String>,
    pub surgery_date_end: Option<String>,
    pub reference_date: Option<String>,
}

impl CohortQuery {
    pub fn filter(&self) -> Result<CohortFilter, ApiError> {
        Ok(CohortFilter {
            idh_status: parse_field("idh_status", &self.idh_status)?,
            mgmt_status: parse_field("mgmt_status", &self.mgmt_status)?,
            who_grade: parse_field("who_grade", &self.who_grade)?,
            age_min: parse_field("age_min", &self.age_min)?,
            age_max: parse_field("age_max", &self.age_max)?,
            surgery_date_start: parse_date_field("surgery_date_start", &self.surgery_date_start)?,
            surgery_date_end: parse_date_field("surgery_date_end", &self.surgery_date_end)?,
        })
    }

    pub fn reference_date(&self, today: NaiveDate) -> Result<NaiveDate, ApiError> {
        Ok(parse_date_field("reference_date", &self.reference_date)?.unwrap_or(today))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_field<T: FromStr>(name: &str, value: &Option<String>) -> Result<Option<T>, ApiError> {
    non_blank(value)
        .map(|s| {
            s.parse::<T>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid {name}: '{s}'")))
        })
        .transpose()
}

fn parse_date_field(name: &str, value: &Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    non_blank(value)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                ApiError::BadRequest(format!("Invalid {name}: '{s}', expected YYYY-MM-DD"))
            })
        })
        .transpose()
}
