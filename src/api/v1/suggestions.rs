use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    api::{errors::ApiResult, extract::ActingUser},
    app::bootstrap::AppState,
    domain::models::Suggestion,
    dto::{
        chatroom::{DeletedResponse, PageQuery},
        suggestions::{
            CreateSuggestionRequest, SuggestionQuery, SuggestionsPageResponse,
            UpdateSuggestionStatusRequest,
        },
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/suggestions",
            post(create_suggestion).get(my_suggestions),
        )
        .route(
            "/api/v1/suggestions/:id",
            get(get_suggestion).delete(delete_suggestion),
        )
        .route("/api/v1/admin/suggestions", get(list_suggestions))
        .route(
            "/api/v1/admin/suggestions/:id/status",
            put(update_suggestion_status),
        )
}

#[utoipa::path(
    post,
    path = "/api/v1/suggestions",
    tag = "suggestions",
    request_body = CreateSuggestionRequest,
    responses((status = 200, body = Suggestion), (status = 400, description = "Missing title or description"))
)]
#[instrument(skip(state, user, payload))]
pub async fn create_suggestion(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(payload): Json<CreateSuggestionRequest>,
) -> ApiResult<Json<Suggestion>> {
    let suggestion = state
        .suggestion_service
        .create_suggestion(&user.id, &payload.title, &payload.description)
        .await?;
    Ok(Json(suggestion))
}

#[utoipa::path(
    get,
    path = "/api/v1/suggestions",
    tag = "suggestions",
    params(PageQuery),
    responses((status = 200, body = SuggestionsPageResponse))
)]
#[instrument(skip(state, user))]
pub async fn my_suggestions(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<SuggestionsPageResponse>> {
    let pagination = query.pagination(state.config.default_page_limit);
    let page = state
        .suggestion_service
        .list_my_suggestions(&user.id, pagination)
        .await?;
    Ok(Json(SuggestionsPageResponse::new(page, pagination)))
}

#[utoipa::path(
    get,
    path = "/api/v1/suggestions/{id}",
    tag = "suggestions",
    params(("id" = Uuid, Path, description = "Suggestion id")),
    responses((status = 200, body = Suggestion), (status = 403, description = "Neither owner nor admin"))
)]
#[instrument(skip(state, user))]
pub async fn get_suggestion(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Suggestion>> {
    let suggestion = state.suggestion_service.get_suggestion(&user.id, id).await?;
    Ok(Json(suggestion))
}

#[utoipa::path(
    delete,
    path = "/api/v1/suggestions/{id}",
    tag = "suggestions",
    params(("id" = Uuid, Path, description = "Suggestion id")),
    responses((status = 200, body = DeletedResponse))
)]
#[instrument(skip(state, user))]
pub async fn delete_suggestion(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    state
        .suggestion_service
        .delete_suggestion(&user.id, id)
        .await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/suggestions",
    tag = "suggestions",
    params(SuggestionQuery),
    responses((status = 200, body = SuggestionsPageResponse), (status = 403, description = "Not an admin"))
)]
#[instrument(skip(state, admin))]
pub async fn list_suggestions(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Query(query): Query<SuggestionQuery>,
) -> ApiResult<Json<SuggestionsPageResponse>> {
    let pagination = query.pagination(state.config.default_page_limit);
    let page = state
        .suggestion_service
        .list_suggestions(&admin.id, query.status, pagination)
        .await?;
    Ok(Json(SuggestionsPageResponse::new(page, pagination)))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/suggestions/{id}/status",
    tag = "suggestions",
    params(("id" = Uuid, Path, description = "Suggestion id")),
    request_body = UpdateSuggestionStatusRequest,
    responses((status = 200, body = Suggestion))
)]
#[instrument(skip(state, admin, payload))]
pub async fn update_suggestion_status(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSuggestionStatusRequest>,
) -> ApiResult<Json<Suggestion>> {
    let suggestion = state
        .suggestion_service
        .update_suggestion_status(&admin.id, id, payload.status, payload.admin_notes)
        .await?;
    Ok(Json(suggestion))
}
