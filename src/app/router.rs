use axum::{routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{api, app::bootstrap::AppState, oas::ApiDoc};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(api::errors::ping))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api::v1::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
