use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    api::{errors::ApiResult, extract::ActingUser},
    app::bootstrap::AppState,
    dto::{
        chatroom::{DeletedResponse, PageQuery},
        users::{UserResponse, UsersPageResponse},
    },
    error::AppError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/admin/posts/:id", delete(remove_post))
        .route("/api/v1/admin/comments/:id", delete(remove_comment))
        .route("/api/v1/admin/users/:id/ban", post(ban_user))
        .route("/api/v1/admin/users/:id/unban", post(unban_user))
        .route("/api/v1/admin/users/:id/promote", post(promote_user))
        .route("/api/v1/admin/users/:id/demote", post(demote_user))
        .route("/api/v1/admin/users/banned", get(banned_users))
        .route("/api/v1/admin/users/admins", get(admin_users))
}

fn require_admin(user: &crate::domain::models::User) -> ApiResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    Err(AppError::PermissionDenied(format!(
        "user {} is not an admin",
        user.id
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/posts/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Post id")),
    responses((status = 200, body = DeletedResponse), (status = 403, description = "Not an admin"))
)]
#[instrument(skip(state, admin))]
pub async fn remove_post(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    require_admin(&admin)?;
    state.chatroom_service.delete_post(id, &admin.id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/comments/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Comment id")),
    responses((status = 200, body = DeletedResponse), (status = 403, description = "Not an admin"))
)]
#[instrument(skip(state, admin))]
pub async fn remove_comment(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    require_admin(&admin)?;
    state.chatroom_service.delete_comment(id, &admin.id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/ban",
    tag = "admin",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, body = UserResponse))
)]
#[instrument(skip(state, admin))]
pub async fn ban_user(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users_service.ban_user(&admin.id, &id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/unban",
    tag = "admin",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, body = UserResponse))
)]
#[instrument(skip(state, admin))]
pub async fn unban_user(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users_service.unban_user(&admin.id, &id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/promote",
    tag = "admin",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, body = UserResponse))
)]
#[instrument(skip(state, admin))]
pub async fn promote_user(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users_service.promote_to_admin(&admin.id, &id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/demote",
    tag = "admin",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, body = UserResponse), (status = 409, description = "Not an admin"))
)]
#[instrument(skip(state, admin))]
pub async fn demote_user(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users_service.demote_from_admin(&admin.id, &id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users/banned",
    tag = "admin",
    params(PageQuery),
    responses((status = 200, body = UsersPageResponse))
)]
#[instrument(skip(state, admin))]
pub async fn banned_users(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<UsersPageResponse>> {
    let pagination = query.pagination(state.config.default_page_limit);
    let page = state
        .users_service
        .list_banned_users(&admin.id, pagination)
        .await?;
    Ok(Json(UsersPageResponse::new(page, pagination)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users/admins",
    tag = "admin",
    params(PageQuery),
    responses((status = 200, body = UsersPageResponse))
)]
#[instrument(skip(state, admin))]
pub async fn admin_users(
    State(state): State<AppState>,
    ActingUser(admin): ActingUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<UsersPageResponse>> {
    let pagination = query.pagination(state.config.default_page_limit);
    let page = state
        .users_service
        .list_admin_users(&admin.id, pagination)
        .await?;
    Ok(Json(UsersPageResponse::new(page, pagination)))
}
