//! Analytics API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. All routes are read-only `GET`s.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the analytics API router.
///
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`);
/// the access log wraps every route.
pub fn analytics_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    let analytics = Router::new()
        .route("/survival", get(endpoints::analytics::survival))
        .route(
            "/survival/patients",
            get(endpoints::analytics::survival_patients),
        )
        .route(
            "/treatment-response",
            get(endpoints::analytics::treatment_response),
        )
        .route(
            "/treatment-response/courses",
            get(endpoints::analytics::treatment_courses),
        )
        .route(
            "/molecular-correlations",
            get(endpoints::analytics::molecular_correlations),
        )
        .route("/comprehensive", get(endpoints::analytics::comprehensive));

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/reports/cohort", get(endpoints::reports::cohort))
        .nest("/analytics", analytics)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access));

    Router::new().nest("/api", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::analytics::fixtures;

    /// CoreState backed by a temp database seeded with the sample cohort.
    /// The tempdir guard must be kept alive for the duration of the test.
    fn seeded_core() -> (Arc<CoreState>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let core = CoreState::new(tmp.path().join("gbm.db"));
        let conn = core.open_db().unwrap();
        fixtures::seed(&conn, &fixtures::sample_records()).unwrap();
        (Arc::new(core), tmp)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_database_reachable() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(analytics_router(core), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"], true);
        assert_eq!(json["version"], crate::config::APP_VERSION);
    }

    #[tokio::test]
    async fn survival_over_all_patients() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(analytics_router(core), "/api/analytics/survival").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_patients"], 4);
        assert_eq!(json["progressed_patients"], 2);
        assert_eq!(json["time_to_progression"]["count"], 2);
    }

    #[tokio::test]
    async fn survival_scoped_by_patient_ids() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(
            analytics_router(core),
            "/api/analytics/survival?patient_ids=1,3",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_patients"], 2);
        assert_eq!(json["progression_rate"], 1.0);
    }

    #[tokio::test]
    async fn blank_patient_ids_mean_all() {
        let (core, _tmp) = seeded_core();
        let (_, json) = get_json(analytics_router(core), "/api/analytics/survival?patient_ids=").await;
        assert_eq!(json["total_patients"], 4);
    }

    #[tokio::test]
    async fn non_integer_patient_id_is_bad_request() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(
            analytics_router(core),
            "/api/analytics/comprehensive?patient_ids=1,abc",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn survival_patients_listed() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(
            analytics_router(core),
            "/api/analytics/survival/patients?patient_ids=1",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["time_to_progression_days"], 152);
        assert_eq!(list[0]["progression_date"], "2024-06-01");
    }

    #[tokio::test]
    async fn treatment_response_without_assessments_is_count_only() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(
            analytics_router(core),
            "/api/analytics/treatment-response?patient_ids=4",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "total_treatments": 0 }));
    }

    #[tokio::test]
    async fn treatment_courses_listed() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(
            analytics_router(core),
            "/api/analytics/treatment-response/courses",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let courses = json.as_array().unwrap();
        assert_eq!(courses.len(), 3);
        assert_eq!(courses[0]["best_response"], "partial_response");
        assert_eq!(courses[0]["time_to_response_days"], 31);
    }

    #[tokio::test]
    async fn molecular_correlations_grouped() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(
            analytics_router(core),
            "/api/analytics/molecular-correlations",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_patients_with_molecular_data"], 3);
        assert_eq!(json["correlations"].as_array().unwrap().len(), 2);
        assert_eq!(json["idh_distribution"]["mutant"], 2);
    }

    #[tokio::test]
    async fn comprehensive_report_has_cohort_size() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(
            analytics_router(core),
            "/api/analytics/comprehensive?patient_ids=1,2",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["patient_cohort_size"], 2);
        assert_eq!(json["survival_analysis"]["total_patients"], 2);
        assert_eq!(json["treatment_response"]["total_treatments"], 2);
        assert_eq!(
            json["molecular_correlations"]["correlations"][0]["combination"],
            "IDH-mutant/MGMT-methylated/Grade-IV"
        );
    }

    #[tokio::test]
    async fn cohort_report_filters_by_marker() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(
            analytics_router(core),
            "/api/reports/cohort?idh_status=mutant&age_min=&reference_date=2024-06-01",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["patient_ids"], serde_json::json!([1, 2]));
        assert_eq!(json["filters_applied"], serde_json::json!(["IDH: mutant"]));
        assert_eq!(json["analytics"]["patient_cohort_size"], 2);
    }

    #[tokio::test]
    async fn cohort_report_rejects_unknown_grade() {
        let (core, _tmp) = seeded_core();
        let (status, json) = get_json(analytics_router(core), "/api/reports/cohort?who_grade=V").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn unreadable_database_is_internal_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file.
        let core = Arc::new(CoreState::new(tmp.path()));
        let (status, json) = get_json(analytics_router(core), "/api/analytics/survival").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (core, _tmp) = seeded_core();
        let (status, _) = get_json(analytics_router(core), "/api/analytics/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
