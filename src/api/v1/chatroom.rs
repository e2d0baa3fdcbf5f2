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
    domain::models::{Comment, Post},
    dto::chatroom::{
        CommentsPageResponse, CreateCommentRequest, CreatePostRequest, DeletedResponse, PageQuery,
        PostsPageResponse, RecentTotalResponse,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/chatroom/post", post(create_post))
        .route("/api/v1/chatroom/posts", get(get_posts))
        .route("/api/v1/chatroom/recent_post_total", get(recent_post_total))
        .route("/api/v1/chatroom/post/:id", get(get_post).delete(delete_post))
        .route("/api/v1/chatroom/post/:id/comment", post(comment_on_post))
        .route("/api/v1/chatroom/post/:id/comments", get(get_comments))
        .route("/api/v1/chatroom/post/:id/like", post(like_post))
        .route("/api/v1/chatroom/comment/:id/comment", post(reply_to_comment))
        .route("/api/v1/chatroom/comment/:id/like", post(like_comment))
        .route("/api/v1/chatroom/comment/:id", delete(delete_comment))
}

#[utoipa::path(
    post,
    path = "/api/v1/chatroom/post",
    tag = "chatroom",
    request_body = CreatePostRequest,
    responses((status = 200, body = Post), (status = 400, description = "Empty content"))
)]
#[instrument(skip(state, user, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<Json<Post>> {
    let post = state
        .chatroom_service
        .create_post(&user.id, &payload.content, payload.post_type)
        .await?;
    Ok(Json(post))
}

#[utoipa::path(
    get,
    path = "/api/v1/chatroom/posts",
    tag = "chatroom",
    params(PageQuery),
    responses((status = 200, body = PostsPageResponse))
)]
#[instrument(skip(state, _user))]
pub async fn get_posts(
    State(state): State<AppState>,
    ActingUser(_user): ActingUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PostsPageResponse>> {
    let pagination = query.pagination(state.config.default_page_limit);
    let page = state.chatroom_service.get_posts(pagination).await?;
    Ok(Json(PostsPageResponse::new(page, pagination)))
}

#[utoipa::path(
    get,
    path = "/api/v1/chatroom/recent_post_total",
    tag = "chatroom",
    responses((status = 200, body = RecentTotalResponse))
)]
#[instrument(skip(state, _user))]
pub async fn recent_post_total(
    State(state): State<AppState>,
    ActingUser(_user): ActingUser,
) -> ApiResult<Json<RecentTotalResponse>> {
    let window = state.config.recent_window;
    let total = state.chatroom_service.recent_activity_total(window).await?;
    Ok(Json(RecentTotalResponse {
        total,
        window_hours: window.as_secs() / 3600,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/chatroom/post/{id}",
    tag = "chatroom",
    params(("id" = Uuid, Path, description = "Post id")),
    responses((status = 200, body = Post), (status = 404, description = "Post not found"))
)]
#[instrument(skip(state, _user))]
pub async fn get_post(
    State(state): State<AppState>,
    ActingUser(_user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.chatroom_service.get_post(id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/chatroom/post/{id}",
    tag = "chatroom",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 403, description = "Only the author or an admin may delete")
    )
)]
#[instrument(skip(state, user))]
pub async fn delete_post(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    state.chatroom_service.delete_post(id, &user.id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

#[utoipa::path(
    post,
    path = "/api/v1/chatroom/post/{id}/comment",
    tag = "chatroom",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = CreateCommentRequest,
    responses((status = 200, body = Comment))
)]
#[instrument(skip(state, user, payload))]
pub async fn comment_on_post(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    let comment = state
        .chatroom_service
        .comment_on_post(id, &user.id, &payload.content)
        .await?;
    Ok(Json(comment))
}

#[utoipa::path(
    post,
    path = "/api/v1/chatroom/comment/{id}/comment",
    tag = "chatroom",
    params(("id" = Uuid, Path, description = "Parent comment id")),
    request_body = CreateCommentRequest,
    responses((status = 200, body = Comment))
)]
#[instrument(skip(state, user, payload))]
pub async fn reply_to_comment(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    let reply = state
        .chatroom_service
        .reply_to_comment(id, &user.id, &payload.content)
        .await?;
    Ok(Json(reply))
}

#[utoipa::path(
    get,
    path = "/api/v1/chatroom/post/{id}/comments",
    tag = "chatroom",
    params(("id" = Uuid, Path, description = "Post id"), PageQuery),
    responses((status = 200, body = CommentsPageResponse))
)]
#[instrument(skip(state, _user))]
pub async fn get_comments(
    State(state): State<AppState>,
    ActingUser(_user): ActingUser,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<CommentsPageResponse>> {
    let pagination = query.pagination(state.config.default_page_limit);
    let page = state
        .chatroom_service
        .get_comments_by_post(id, pagination)
        .await?;
    Ok(Json(CommentsPageResponse::new(page, pagination)))
}

#[utoipa::path(
    post,
    path = "/api/v1/chatroom/post/{id}/like",
    tag = "chatroom",
    params(("id" = Uuid, Path, description = "Post id")),
    responses((status = 200, body = Post))
)]
#[instrument(skip(state, user))]
pub async fn like_post(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.chatroom_service.like_post(id, &user.id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/chatroom/comment/{id}/like",
    tag = "chatroom",
    params(("id" = Uuid, Path, description = "Comment id")),
    responses((status = 200, body = Comment))
)]
#[instrument(skip(state, user))]
pub async fn like_comment(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Comment>> {
    Ok(Json(state.chatroom_service.like_comment(id, &user.id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/chatroom/comment/{id}",
    tag = "chatroom",
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 403, description = "Only the author or an admin may delete")
    )
)]
#[instrument(skip(state, user))]
pub async fn delete_comment(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    state.chatroom_service.delete_comment(id, &user.id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
