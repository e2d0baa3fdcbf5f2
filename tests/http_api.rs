use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use chatroom_server::{
    app::{
        bootstrap::{build_state, AppState},
        router::create_router,
    },
    domain::models::PostType,
    infra::config::AppConfig,
};

fn request(method: Method, uri: &str, user_id: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id);
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn status(app: &Router, req: Request<Body>) -> StatusCode {
    app.clone().oneshot(req).await.unwrap().status()
}

async fn setup() -> (Router, AppState) {
    let state = build_state(AppConfig::default());
    (create_router(state.clone()), state)
}

#[tokio::test]
async fn identity_header_is_enforced() {
    let (app, state) = setup().await;
    let alice = state
        .users_service
        .create_user("Alice", "north", "alice@example.com")
        .await
        .unwrap();
    let admin = state.users_service.bootstrap_admin("root").await.unwrap();

    assert_eq!(
        status(&app, request(Method::GET, "/api/v1/chatroom/posts", None, None)).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status(&app, request(Method::GET, "/api/v1/chatroom/posts", Some("ghost"), None)).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status(&app, request(Method::GET, "/api/v1/users/me", Some(&alice.id), None)).await,
        StatusCode::OK
    );

    state
        .users_service
        .ban_user(&admin.id, &alice.id)
        .await
        .unwrap();
    assert_eq!(
        status(&app, request(Method::GET, "/api/v1/chatroom/posts", Some(&alice.id), None)).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn errors_map_to_status_codes() {
    let (app, state) = setup().await;
    let alice = state
        .users_service
        .create_user("Alice", "north", "alice@example.com")
        .await
        .unwrap();
    let bob = state
        .users_service
        .create_user("Bob", "south", "bob@example.com")
        .await
        .unwrap();
    let post = state
        .chatroom_service
        .create_post(&alice.id, "hello", PostType::Text)
        .await
        .unwrap();

    let blank = r#"{"content": "  "}"#;
    assert_eq!(
        status(&app, request(Method::POST, "/api/v1/chatroom/post", Some(&alice.id), Some(blank))).await,
        StatusCode::BAD_REQUEST
    );

    let missing = format!("/api/v1/chatroom/post/{}", uuid::Uuid::new_v4());
    assert_eq!(
        status(&app, request(Method::GET, &missing, Some(&alice.id), None)).await,
        StatusCode::NOT_FOUND
    );

    let uri = format!("/api/v1/chatroom/post/{}", post.id);
    assert_eq!(
        status(&app, request(Method::DELETE, &uri, Some(&bob.id), None)).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status(&app, request(Method::DELETE, &format!("/api/v1/admin/posts/{}", post.id), Some(&alice.id), None)).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status(&app, request(Method::DELETE, &uri, Some(&alice.id), None)).await,
        StatusCode::OK
    );

    let duplicate = r#"{"name": "Other", "province": "east", "contact": "bob@example.com"}"#;
    assert_eq!(
        status(&app, request(Method::POST, "/api/v1/users", None, Some(duplicate))).await,
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn comment_and_like_routes_work_end_to_end() {
    let (app, state) = setup().await;
    let alice = state
        .users_service
        .create_user("Alice", "north", "alice@example.com")
        .await
        .unwrap();
    let post = state
        .chatroom_service
        .create_post(&alice.id, "hello", PostType::Text)
        .await
        .unwrap();

    let comment = format!("/api/v1/chatroom/post/{}/comment", post.id);
    assert_eq!(
        status(&app, request(Method::POST, &comment, Some(&alice.id), Some(r#"{"content": "hi"}"#))).await,
        StatusCode::OK
    );
    let like = format!("/api/v1/chatroom/post/{}/like", post.id);
    assert_eq!(
        status(&app, request(Method::POST, &like, Some(&alice.id), None)).await,
        StatusCode::OK
    );
    let comments = format!("/api/v1/chatroom/post/{}/comments?limit=0", post.id);
    assert_eq!(
        status(&app, request(Method::GET, &comments, Some(&alice.id), None)).await,
        StatusCode::OK
    );
    assert_eq!(
        status(&app, request(Method::GET, "/api/v1/chatroom/recent_post_total", Some(&alice.id), None)).await,
        StatusCode::OK
    );

    let post = state.chatroom_service.get_post(post.id).await.unwrap();
    assert_eq!(post.likes, 1);
    assert_eq!(post.comments.len(), 1);
}

#[tokio::test]
async fn public_routes_need_no_identity() {
    let (app, _state) = setup().await;
    for uri in ["/ping", "/api/v1/health", "/api-docs/openapi.json"] {
        assert_eq!(
            status(&app, request(Method::GET, uri, None, None)).await,
            StatusCode::OK,
            "{uri}"
        );
    }
}

#[tokio::test]
async fn information_and_suggestion_routes_enforce_roles() {
    let (app, state) = setup().await;
    let alice = state
        .users_service
        .create_user("Alice", "north", "alice@example.com")
        .await
        .unwrap();
    let admin = state.users_service.bootstrap_admin("root").await.unwrap();

    let notice = r#"{"title": "market day", "content": "saturday", "type": "event", "published": true}"#;
    assert_eq!(
        status(&app, request(Method::POST, "/api/v1/admin/info", Some(&alice.id), Some(notice))).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status(&app, request(Method::POST, "/api/v1/admin/info", Some(&admin.id), Some(notice))).await,
        StatusCode::OK
    );
    assert_eq!(
        status(&app, request(Method::GET, "/api/v1/info?page=1&limit=5", Some(&alice.id), None)).await,
        StatusCode::OK
    );

    let idea = r#"{"title": "dark mode", "description": "please"}"#;
    assert_eq!(
        status(&app, request(Method::POST, "/api/v1/suggestions", Some(&alice.id), Some(idea))).await,
        StatusCode::OK
    );
    let mine = state
        .suggestion_service
        .list_my_suggestions(&alice.id, chatroom_server::domain::value_objects::Pagination::ALL)
        .await
        .unwrap();
    let review = format!("/api/v1/admin/suggestions/{}/status", mine.items[0].id);
    let body = r#"{"status": "approved", "adminNotes": "soon"}"#;
    assert_eq!(
        status(&app, request(Method::PUT, &review, Some(&alice.id), Some(body))).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status(&app, request(Method::PUT, &review, Some(&admin.id), Some(body))).await,
        StatusCode::OK
    );
    assert_eq!(
        status(&app, request(Method::GET, "/api/v1/admin/suggestions?status=approved", Some(&admin.id), None)).await,
        StatusCode::OK
    );

    assert_eq!(
        status(&app, request(Method::GET, "/api/v1/admin/users/banned", Some(&admin.id), None)).await,
        StatusCode::OK
    );
    assert_eq!(
        status(&app, request(Method::GET, "/api/v1/admin/users/admins", Some(&alice.id), None)).await,
        StatusCode::FORBIDDEN
    );
    let demote = format!("/api/v1/admin/users/{}/demote", alice.id);
    assert_eq!(
        status(&app, request(Method::POST, &demote, Some(&admin.id), None)).await,
        StatusCode::CONFLICT
    );
}
