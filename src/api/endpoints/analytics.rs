//! Analytics endpoints.
//!
//! Every route takes `?patient_ids=` and runs its analytics inside one read
//! snapshot of the store.

use axum::extract::{Query, State};
use axum::Json;

use crate::analytics::{
    self, ComprehensiveAnalytics, MolecularSummary, ResponseStatistics, SurvivalMetrics,
    SurvivalStatistics, TreatmentResponse,
};
use crate::api::error::ApiError;
use crate::api::types::{AnalyticsQuery, ApiContext};

/// `GET /api/analytics/survival`
pub async fn survival(
    State(ctx): State<ApiContext>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<SurvivalStatistics>, ApiError> {
    let cohort = query.cohort()?;
    let result = ctx.core.read_snapshot(|conn| analytics::get_survival_statistics(conn, &cohort))?;
    Ok(Json(result))
}

/// `GET /api/analytics/survival/patients`
pub async fn survival_patients(
    State(ctx): State<ApiContext>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<SurvivalMetrics>>, ApiError> {
    let cohort = query.cohort()?;
    let result = ctx.core.read_snapshot(|conn| analytics::calculate_survival_metrics(conn, &cohort))?;
    Ok(Json(result))
}

/// `GET /api/analytics/treatment-response`
pub async fn treatment_response(
    State(ctx): State<ApiContext>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ResponseStatistics>, ApiError> {
    let cohort = query.cohort()?;
    let result = ctx.core.read_snapshot(|conn| analytics::get_response_statistics(conn, &cohort))?;
    Ok(Json(result))
}

/// `GET /api/analytics/treatment-response/courses`
pub async fn treatment_courses(
    State(ctx): State<ApiContext>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<TreatmentResponse>>, ApiError> {
    let cohort = query.cohort()?;
    let result = ctx.core.read_snapshot(|conn| analytics::analyze_treatment_responses(conn, &cohort))?;
    Ok(Json(result))
}

/// `GET /api/analytics/molecular-correlations`
pub async fn molecular_correlations(
    State(ctx): State<ApiContext>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<MolecularSummary>, ApiError> {
    let cohort = query.cohort()?;
    let result = ctx.core.read_snapshot(|conn| analytics::get_molecular_summary(conn, &cohort))?;
    Ok(Json(result))
}

/// `GET /api/analytics/comprehensive`
pub async fn comprehensive(
    State(ctx): State<ApiContext>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ComprehensiveAnalytics>, ApiError> {
    let cohort = query.cohort()?;
    let result = ctx.core.read_snapshot(|conn| analytics::generate_comprehensive_analytics(conn, &cohort))?;
    Ok(Json(result))
}
