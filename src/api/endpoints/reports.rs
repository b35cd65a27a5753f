//! Cohort report endpoint.
//!
//! `GET /api/reports/cohort`: filter patients by molecular markers, age
//! and surgery window, then run the comprehensive analytics on the match.

use axum::extract::{Query, State};
use axum::Json;

use crate::analytics::{self, CohortReport};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, CohortQuery};

pub async fn cohort(
    State(ctx): State<ApiContext>,
    Query(query): Query<CohortQuery>,
) -> Result<Json<CohortReport>, ApiError> {
    let filter = query.filter()?;
    let reference_date = query.reference_date(chrono::Local::now().date_naive())?;
    let report = ctx
        .core
        .read_snapshot(|conn| analytics::build_cohort_report(conn, &filter, reference_date))?;
    tracing::info!(
        matched = report.patient_ids.len(),
        filters = report.filters_applied.len(),
        "Cohort report built"
    );
    Ok(Json(report))
}
