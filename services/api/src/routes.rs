use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use transfer_match::workflows::catalog::CatalogProvider;
use transfer_match::workflows::recommendation::{recommendation_router, RecommendationService};

pub(crate) fn with_recommendation_routes(
    service: Arc<RecommendationService<CatalogProvider>>,
) -> axum::Router {
    recommendation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::sample_catalog;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn app() -> axum::Router {
        let provider = Arc::new(CatalogProvider::new(sample_catalog()));
        let service = Arc::new(RecommendationService::new(provider));
        with_recommendation_routes(service)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn recommendations_flow_through_the_mounted_router() {
        let body = json!({
            "profile": { "major": "Nursing", "gpa": "3.2", "state": "WA" },
            "questionnaire": { "in_state_out_of_state": "in_state" }
        });
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/recommendations")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json payload");
        assert!(!payload["results"]
            .as_array()
            .expect("results array")
            .is_empty());
    }
}
