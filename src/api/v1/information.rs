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
    domain::models::Information,
    dto::{
        chatroom::{DeletedResponse, PageQuery},
        information::{CreateInformationRequest, InformationPageResponse, UpdateInformationRequest},
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/info", get(list_information))
        .route("/api/v1/info/:id", get(get_information))
        .route("/api/v1/admin/info", post(create_information))
        .route(
            "/api/v1/admin/info/:id",
            put(update_information).delete(delete_information),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/info",
    tag = "information",
    params(PageQuery),
    responses((status = 200, body = InformationPageResponse))
)]
#[instrument(skip(state, user))]
pub async fn list_information(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<InformationPageResponse>> {
    let pagination = query.pagination(state.config.default_page_limit);
    let page = state
        .information_service
        .list_information(&user.id, pagination)
        .await?;
    Ok(Json(InformationPageResponse::new(page, pagination)))
}

#[utoipa::path(
    get,
    path = "/api/v1/info/{id}",
    tag = "information",
    params(("id" = Uuid, Path, description = "Information id")),
    responses((status = 200, body = Information), (status = 404, description = "Unknown or unpublished"))
)]
#[instrument(skip(state, user))]
pub async fn get_information(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Information>> {
    let info = state.information_service.get_information(&user.id, id).await?;
    Ok(Json(info))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/info",
    tag = "information",
    request_body = CreateInformationRequest,
    responses((status = 200, body = Information), (status = 403, description = "Not an admin"))
)]
#[instrument(skip(state, admin, payload))]
pub async fn create_information(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Json(payload): Json<CreateInformationRequest>,
) -> ApiResult<Json<Information>> {
    let info = state
        .information_service
        .create_information(&admin.id, payload.into())
        .await?;
    Ok(Json(info))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/info/{id}",
    tag = "information",
    params(("id" = Uuid, Path, description = "Information id")),
    request_body = UpdateInformationRequest,
    responses((status = 200, body = Information))
)]
#[instrument(skip(state, admin, payload))]
pub async fn update_information(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInformationRequest>,
) -> ApiResult<Json<Information>> {
    let info = state
        .information_service
        .update_information(&admin.id, id, payload.into())
        .await?;
    Ok(Json(info))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/info/{id}",
    tag = "information",
    params(("id" = Uuid, Path, description = "Information id")),
    responses((status = 200, body = DeletedResponse))
)]
#[instrument(skip(state, admin))]
pub async fn delete_information(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    state
        .information_service
        .delete_information(&admin.id, id)
        .await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
