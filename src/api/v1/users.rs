use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    api::{errors::ApiResult, extract::ActingUser},
    app::bootstrap::AppState,
    dto::{
        chatroom::HealthResponse,
        users::{CreateUserRequest, UserResponse},
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users/me", get(me))
}

#[utoipa::path(get, path = "/api/v1/health", tag = "users", responses((status = 200, body = HealthResponse)))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        connections: state.registry.connection_count(),
        connected_users: state.registry.user_count(),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses((status = 200, body = UserResponse), (status = 409, description = "Contact already registered"))
)]
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users_service
        .create_user(&payload.name, &payload.province, &payload.contact)
        .await?;
    Ok(Json(user.into()))
}

#[utoipa::path(get, path = "/api/v1/users/me", tag = "users", responses((status = 200, body = UserResponse)))]
pub async fn me(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users_service.get_user(&user.id).await?;
    Ok(Json(user.into()))
}
