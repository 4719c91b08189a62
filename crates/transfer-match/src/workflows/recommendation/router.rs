use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use super::provider::CandidateProvider;
use super::service::{RecommendationRequest, RecommendationService};

/// Router builder exposing the recommendation entry point over HTTP.
pub fn recommendation_router<P>(service: Arc<RecommendationService<P>>) -> Router
where
    P: CandidateProvider + 'static,
{
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler::<P>))
        .with_state(service)
}

/// Expected zero-result conditions are part of the 200 payload (as
/// `empty_state`); malformed bodies are rejected by the Json extractor.
pub(crate) async fn recommend_handler<P>(
    State(service): State<Arc<RecommendationService<P>>>,
    axum::Json(request): axum::Json<RecommendationRequest>,
) -> Response
where
    P: CandidateProvider + 'static,
{
    let outcome = service.recommend(request).await;
    (StatusCode::OK, axum::Json(outcome)).into_response()
}
