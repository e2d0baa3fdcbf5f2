use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

use chatroom_server::{
    app::bootstrap::{build_state, AppState},
    domain::{
        models::{Comment, CommentParent, PostType, User},
        traits::{CommentsRepo, Connection, LikeToggle, PostsRepo, UsersRepo},
        value_objects::{Page, Pagination},
    },
    error::AppError,
    infra::{
        config::AppConfig,
        repos::memory::{MemoryCommentsRepo, MemoryPostsRepo, MemoryUsersRepo},
        ws::broadcaster::ConnectionRegistry,
    },
    services::{comment_tree::CommentTreeFetcher, ChatroomService, UsersService},
};

#[derive(Default)]
struct Recorder {
    id: Uuid,
    frames: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<Value> {
        self.frames
            .lock()
            .iter()
            .map(|frame| serde_json::from_str(frame).unwrap())
            .collect()
    }

    fn event_types(&self) -> Vec<String> {
        self.events()
            .iter()
            .map(|event| event["type"].as_str().unwrap().to_string())
            .collect()
    }
}

#[async_trait]
impl Connection for Recorder {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn send_text(&self, text: &str) -> Result<(), AppError> {
        self.frames.lock().push(text.to_string());
        Ok(())
    }

    async fn close(&self) {}
}

struct Harness {
    state: AppState,
    alice: User,
    bob: User,
    admin: User,
    listener: Arc<Recorder>,
}

async fn harness() -> Harness {
    let state = build_state(AppConfig::default());
    let users = &state.users_service;
    let alice = users
        .create_user("Alice", "north", "alice@example.com")
        .await
        .unwrap();
    let bob = users
        .create_user("Bob", "south", "bob@example.com")
        .await
        .unwrap();
    let admin = users.bootstrap_admin("root").await.unwrap();

    let listener = Arc::new(Recorder {
        id: Uuid::new_v4(),
        ..Default::default()
    });
    state
        .registry
        .register("observer", listener.clone())
        .unwrap();

    Harness {
        state,
        alice,
        bob,
        admin,
        listener,
    }
}

#[tokio::test]
async fn post_with_comments_and_reply_comes_back_in_order() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;

    let p = chat
        .create_post(&h.alice.id, "first post", PostType::Text)
        .await
        .unwrap();
    let c1 = chat.comment_on_post(p.id, &h.bob.id, "older").await.unwrap();
    let c2 = chat.comment_on_post(p.id, &h.alice.id, "newer").await.unwrap();
    let r1 = chat.reply_to_comment(c1.id, &h.alice.id, "reply").await.unwrap();

    let fetched = chat.get_post(p.id).await.unwrap();
    assert_eq!(fetched.comments.len(), 2);
    assert_eq!(fetched.comments[0].id, c1.id);
    assert_eq!(fetched.comments[0].comments.len(), 1);
    assert_eq!(fetched.comments[0].comments[0].id, r1.id);
    assert_eq!(fetched.comments[1].id, c2.id);
    assert!(fetched.comments[1].comments.is_empty());

    let events = h.listener.events();
    assert_eq!(
        h.listener.event_types(),
        vec!["new_post", "new_comment", "new_comment", "new_comment"]
    );
    assert_eq!(events[1]["payload"]["postID"], p.id.to_string());
    assert!(events[1]["payload"].get("referenceId").is_none());
    assert_eq!(events[3]["payload"]["referenceId"], c1.id.to_string());
    assert_eq!(events[3]["payload"]["comment"]["reference"], "comment");
}

#[tokio::test]
async fn comments_by_post_carry_their_replies() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;

    let p = chat.create_post(&h.alice.id, "thread", PostType::Text).await.unwrap();
    let mut top = Vec::new();
    for i in 0..3 {
        top.push(
            chat.comment_on_post(p.id, &h.bob.id, &format!("comment {i}"))
                .await
                .unwrap(),
        );
    }
    let reply = chat.reply_to_comment(top[2].id, &h.alice.id, "deep").await.unwrap();
    let nested = chat.reply_to_comment(reply.id, &h.bob.id, "deeper").await.unwrap();

    let page = chat
        .get_comments_by_post(p.id, Pagination::new(2, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, top[2].id);
    assert_eq!(page.items[0].comments[0].id, reply.id);
    assert_eq!(page.items[0].comments[0].comments[0].id, nested.id);

    let all = chat.get_comments_by_post(p.id, Pagination::ALL).await.unwrap();
    assert_eq!(all.items.iter().map(|c| c.id).collect::<Vec<_>>(), top.iter().map(|c| c.id).collect::<Vec<_>>());
}

#[tokio::test]
async fn liking_twice_restores_the_post() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;
    let p = chat.create_post(&h.alice.id, "like me", PostType::Image).await.unwrap();

    let liked = chat.like_post(p.id, &h.bob.id).await.unwrap();
    assert_eq!(liked.likes, 1);
    assert!(liked.liked_user_ids.contains(&h.bob.id));

    let unliked = chat.like_post(p.id, &h.bob.id).await.unwrap();
    assert_eq!(unliked.likes, p.likes);
    assert_eq!(unliked.liked_user_ids, p.liked_user_ids);

    let events = h.listener.events();
    let likes: Vec<&Value> = events.iter().filter(|e| e["type"] == "like_post").collect();
    assert_eq!(likes.len(), 2);
    assert_eq!(likes[0]["payload"]["liked"], true);
    assert_eq!(likes[1]["payload"]["liked"], false);
    assert_eq!(likes[0]["payload"]["userID"], h.bob.id.as_str());
}

#[tokio::test]
async fn concurrent_likes_by_one_user_never_double_count() {
    let h = harness().await;
    let chat = h.state.chatroom_service.clone();
    let p = chat.create_post(&h.alice.id, "race", PostType::Text).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let chat = chat.clone();
        let user_id = h.bob.id.clone();
        tasks.push(tokio::spawn(async move { chat.like_post(p.id, &user_id).await }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // an even number of toggles lands back on "not liked"
    let after = chat.get_post(p.id).await.unwrap();
    assert_eq!(after.likes, 0);
    assert!(after.liked_user_ids.is_empty());
}

#[tokio::test]
async fn like_comment_toggles_and_reports_reference() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;
    let p = chat.create_post(&h.alice.id, "post", PostType::Text).await.unwrap();
    let c = chat.comment_on_post(p.id, &h.alice.id, "comment").await.unwrap();

    let liked = chat.like_comment(c.id, &h.bob.id).await.unwrap();
    assert_eq!(liked.likes, 1);
    let unliked = chat.like_comment(c.id, &h.bob.id).await.unwrap();
    assert_eq!(unliked.likes, 0);

    let event = h
        .listener
        .events()
        .into_iter()
        .find(|e| e["type"] == "like_comment")
        .unwrap();
    assert_eq!(event["payload"]["commentID"], c.id.to_string());
    assert_eq!(event["payload"]["reference"], "post");
    assert_eq!(event["payload"]["reference_id"], p.id.to_string());
    assert_eq!(event["payload"]["liked"], true);
}

#[tokio::test]
async fn non_author_cannot_delete_post() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;
    let p = chat.create_post(&h.alice.id, "mine", PostType::Text).await.unwrap();
    let c = chat.comment_on_post(p.id, &h.alice.id, "also mine").await.unwrap();
    chat.like_post(p.id, &h.alice.id).await.unwrap();
    let before = chat.get_post(p.id).await.unwrap();

    let err = chat.delete_post(p.id, &h.bob.id).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    let after = chat.get_post(p.id).await.unwrap();
    assert_eq!(after.likes, before.likes);
    assert_eq!(after.liked_user_ids, before.liked_user_ids);
    assert_eq!(after.comments.len(), 1);
    assert_eq!(after.comments[0].id, c.id);
    assert!(!h.listener.event_types().contains(&"delete_post".to_string()));

    let err = chat.delete_comment(c.id, &h.bob.id).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));
}

#[tokio::test]
async fn deleting_a_post_removes_its_whole_thread() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;
    let p = chat.create_post(&h.alice.id, "doomed", PostType::Text).await.unwrap();
    let keep = chat.create_post(&h.alice.id, "kept", PostType::Text).await.unwrap();
    let c = chat.comment_on_post(p.id, &h.bob.id, "c").await.unwrap();
    let r = chat.reply_to_comment(c.id, &h.alice.id, "r").await.unwrap();
    let kept_comment = chat.comment_on_post(keep.id, &h.bob.id, "stays").await.unwrap();

    chat.delete_post(p.id, &h.alice.id).await.unwrap();

    assert!(matches!(chat.get_post(p.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        chat.reply_to_comment(c.id, &h.bob.id, "late").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        chat.like_comment(r.id, &h.bob.id).await,
        Err(AppError::NotFound(_))
    ));

    let remaining = chat.get_posts(Pagination::ALL).await.unwrap();
    assert_eq!(remaining.total, 1);
    assert_eq!(remaining.items[0].id, keep.id);
    assert_eq!(remaining.items[0].comments[0].id, kept_comment.id);

    let event = h
        .listener
        .events()
        .into_iter()
        .find(|e| e["type"] == "delete_post")
        .unwrap();
    assert_eq!(event["payload"]["postID"], p.id.to_string());
}

#[tokio::test]
async fn admin_deletes_a_comment_subtree() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;
    let p = chat.create_post(&h.alice.id, "post", PostType::Text).await.unwrap();
    let c1 = chat.comment_on_post(p.id, &h.bob.id, "c1").await.unwrap();
    let c2 = chat.comment_on_post(p.id, &h.bob.id, "c2").await.unwrap();
    let r1 = chat.reply_to_comment(c1.id, &h.alice.id, "r1").await.unwrap();
    chat.reply_to_comment(r1.id, &h.bob.id, "r1a").await.unwrap();

    chat.delete_comment(c1.id, &h.admin.id).await.unwrap();

    let fetched = chat.get_post(p.id).await.unwrap();
    assert_eq!(fetched.comments.len(), 1);
    assert_eq!(fetched.comments[0].id, c2.id);
    assert_eq!(fetched.thread_size(), 1);

    let event = h
        .listener
        .events()
        .into_iter()
        .find(|e| e["type"] == "delete_comment")
        .unwrap();
    assert_eq!(event["payload"]["commentID"], c1.id.to_string());
    assert_eq!(event["payload"]["reference_id"], p.id.to_string());
}

#[tokio::test]
async fn posts_are_listed_newest_first_with_pages() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;
    let mut ids = Vec::new();
    for i in 0..5 {
        let p = chat
            .create_post(&h.alice.id, &format!("post {i}"), PostType::Text)
            .await
            .unwrap();
        ids.push(p.id);
    }
    ids.reverse();

    let first = chat.get_posts(Pagination::new(1, 2)).await.unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.items.iter().map(|p| p.id).collect::<Vec<_>>(), ids[..2].to_vec());

    let last = chat.get_posts(Pagination::new(3, 2)).await.unwrap();
    assert_eq!(last.items.iter().map(|p| p.id).collect::<Vec<_>>(), ids[4..].to_vec());

    let all = chat.get_posts(Pagination::ALL).await.unwrap();
    assert_eq!(all.items.len(), 5);
}

#[tokio::test]
async fn blank_content_and_unknown_targets_are_rejected() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;

    assert!(matches!(
        chat.create_post(&h.alice.id, "   ", PostType::Text).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        chat.comment_on_post(Uuid::new_v4(), &h.alice.id, "hi").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        chat.reply_to_comment(Uuid::new_v4(), &h.alice.id, "hi").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        chat.create_post("ghost", "hello", PostType::Text).await,
        Err(AppError::NotFound(_))
    ));
    assert!(h.listener.events().is_empty());
}

#[tokio::test]
async fn recent_total_counts_posts_and_their_threads() {
    let h = harness().await;
    let chat = &h.state.chatroom_service;
    let p = chat.create_post(&h.alice.id, "recent", PostType::Text).await.unwrap();
    let c = chat.comment_on_post(p.id, &h.bob.id, "c").await.unwrap();
    chat.reply_to_comment(c.id, &h.alice.id, "r").await.unwrap();
    chat.create_post(&h.bob.id, "another", PostType::Video).await.unwrap();

    let total = chat
        .recent_activity_total(Duration::from_secs(48 * 3600))
        .await
        .unwrap();
    assert_eq!(total, 4);
}

#[tokio::test]
async fn ban_disconnects_and_locks_out_the_user() {
    let h = harness().await;
    let users = &h.state.users_service;
    let bobs_socket = Arc::new(Recorder {
        id: Uuid::new_v4(),
        ..Default::default()
    });
    h.state
        .registry
        .register(&h.bob.id, bobs_socket)
        .unwrap();

    assert!(matches!(
        users.ban_user(&h.alice.id, &h.bob.id).await,
        Err(AppError::PermissionDenied(_))
    ));

    let banned = users.ban_user(&h.admin.id, &h.bob.id).await.unwrap();
    assert!(!banned.active);
    assert_eq!(h.state.registry.connections_for(&h.bob.id), 0);
    assert!(matches!(
        users.authenticate(&h.bob.id).await,
        Err(AppError::PermissionDenied(_))
    ));
    assert!(matches!(
        users.authenticate("nobody").await,
        Err(AppError::Unauthorized(_))
    ));

    users.unban_user(&h.admin.id, &h.bob.id).await.unwrap();
    assert!(users.authenticate(&h.bob.id).await.is_ok());

    let promoted = users.promote_to_admin(&h.admin.id, &h.bob.id).await.unwrap();
    assert!(promoted.is_admin());
    // a promoted admin may moderate other people's posts
    let p = h
        .state
        .chatroom_service
        .create_post(&h.alice.id, "moderate me", PostType::Text)
        .await
        .unwrap();
    h.state.chatroom_service.delete_post(p.id, &h.bob.id).await.unwrap();
}

#[tokio::test]
async fn duplicate_contact_conflicts() {
    let h = harness().await;
    let err = h
        .state
        .users_service
        .create_user("Alice Again", "east", "alice@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let again = h.state.users_service.bootstrap_admin("root").await.unwrap();
    assert_eq!(again.id, h.admin.id);
}

/// Comment store whose bulk delete is down.
struct DeleteFailsComments {
    inner: MemoryCommentsRepo,
}

#[async_trait]
impl CommentsRepo for DeleteFailsComments {
    async fn insert(&self, comment: Comment) -> Result<Comment, AppError> {
        self.inner.insert(comment).await
    }

    async fn get(&self, comment_id: Uuid) -> Result<Comment, AppError> {
        self.inner.get(comment_id).await
    }

    async fn list_by_parent(
        &self,
        parent: CommentParent,
        pagination: Pagination,
    ) -> Result<Page<Comment>, AppError> {
        self.inner.list_by_parent(parent, pagination).await
    }

    async fn delete_many(&self, _comment_ids: &[Uuid]) -> Result<u64, AppError> {
        Err(AppError::Store("comment store unavailable".into()))
    }

    async fn toggle_like(
        &self,
        comment_id: Uuid,
        user_id: &str,
    ) -> Result<LikeToggle<Comment>, AppError> {
        self.inner.toggle_like(comment_id, user_id).await
    }
}

#[tokio::test]
async fn failed_thread_delete_leaves_the_post_in_place() {
    let posts: Arc<dyn PostsRepo> = Arc::new(MemoryPostsRepo::new());
    let comments: Arc<dyn CommentsRepo> = Arc::new(DeleteFailsComments {
        inner: MemoryCommentsRepo::new(),
    });
    let users_repo: Arc<dyn UsersRepo> = Arc::new(MemoryUsersRepo::new());
    let registry = ConnectionRegistry::new(Duration::from_secs(1));
    let chat = ChatroomService::new(
        posts,
        comments.clone(),
        users_repo.clone(),
        CommentTreeFetcher::new(comments, Duration::from_secs(5)),
        registry.clone(),
        4,
    );
    let users = UsersService::new(users_repo, registry.clone());
    let alice = users
        .create_user("Alice", "north", "alice@example.com")
        .await
        .unwrap();

    let listener = Arc::new(Recorder {
        id: Uuid::new_v4(),
        ..Default::default()
    });
    registry.register("observer", listener.clone()).unwrap();

    let p = chat.create_post(&alice.id, "keep me", PostType::Text).await.unwrap();
    let c = chat.comment_on_post(p.id, &alice.id, "and me").await.unwrap();

    let err = chat.delete_post(p.id, &alice.id).await.unwrap_err();
    assert!(matches!(err, AppError::Store(_)), "got {err:?}");

    let still_there = chat.get_post(p.id).await.unwrap();
    assert_eq!(still_there.comments.len(), 1);
    assert_eq!(still_there.comments[0].id, c.id);
    assert_eq!(chat.get_posts(Pagination::ALL).await.unwrap().total, 1);
    assert!(!listener.event_types().contains(&"delete_post".to_string()));
}

#[tokio::test]
async fn role_and_ban_transitions_are_checked_and_listed() {
    let h = harness().await;
    let users = &h.state.users_service;

    assert!(matches!(
        users.unban_user(&h.admin.id, &h.alice.id).await,
        Err(AppError::Conflict(_))
    ));
    users.ban_user(&h.admin.id, &h.alice.id).await.unwrap();
    assert!(matches!(
        users.ban_user(&h.admin.id, &h.alice.id).await,
        Err(AppError::Conflict(_))
    ));

    let banned = users
        .list_banned_users(&h.admin.id, Pagination::ALL)
        .await
        .unwrap();
    assert_eq!(banned.total, 1);
    assert_eq!(banned.items[0].id, h.alice.id);
    assert!(matches!(
        users.list_banned_users(&h.bob.id, Pagination::ALL).await,
        Err(AppError::PermissionDenied(_))
    ));

    assert!(matches!(
        users.demote_from_admin(&h.admin.id, &h.bob.id).await,
        Err(AppError::Conflict(_))
    ));
    users.promote_to_admin(&h.admin.id, &h.bob.id).await.unwrap();
    assert!(matches!(
        users.promote_to_admin(&h.admin.id, &h.bob.id).await,
        Err(AppError::Conflict(_))
    ));

    // oldest account first: bob registered before the bootstrap admin
    let admins = users
        .list_admin_users(&h.admin.id, Pagination::ALL)
        .await
        .unwrap();
    assert_eq!(
        admins.items.iter().map(|u| u.id.as_str()).collect::<Vec<_>>(),
        vec![h.bob.id.as_str(), h.admin.id.as_str()]
    );

    assert!(matches!(
        users.demote_from_admin(&h.admin.id, &h.admin.id).await,
        Err(AppError::Validation(_))
    ));
    let demoted = users.demote_from_admin(&h.admin.id, &h.bob.id).await.unwrap();
    assert!(!demoted.is_admin());
    let page = users
        .list_admin_users(&h.admin.id, Pagination::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

/// Lets one extra comment land right after the first bulk delete, the way a
/// concurrent insert would.
struct LateInsertComments {
    inner: MemoryCommentsRepo,
    late: Mutex<Option<Comment>>,
}

#[async_trait]
impl CommentsRepo for LateInsertComments {
    async fn insert(&self, comment: Comment) -> Result<Comment, AppError> {
        self.inner.insert(comment).await
    }

    async fn get(&self, comment_id: Uuid) -> Result<Comment, AppError> {
        self.inner.get(comment_id).await
    }

    async fn list_by_parent(
        &self,
        parent: CommentParent,
        pagination: Pagination,
    ) -> Result<Page<Comment>, AppError> {
        self.inner.list_by_parent(parent, pagination).await
    }

    async fn delete_many(&self, comment_ids: &[Uuid]) -> Result<u64, AppError> {
        let removed = self.inner.delete_many(comment_ids).await?;
        let late = self.late.lock().take();
        if let Some(comment) = late {
            self.inner.insert(comment).await?;
        }
        Ok(removed)
    }

    async fn toggle_like(
        &self,
        comment_id: Uuid,
        user_id: &str,
    ) -> Result<LikeToggle<Comment>, AppError> {
        self.inner.toggle_like(comment_id, user_id).await
    }
}

#[tokio::test]
async fn comment_racing_a_post_delete_is_swept() {
    let posts: Arc<dyn PostsRepo> = Arc::new(MemoryPostsRepo::new());
    let racing = Arc::new(LateInsertComments {
        inner: MemoryCommentsRepo::new(),
        late: Mutex::new(None),
    });
    let comments: Arc<dyn CommentsRepo> = racing.clone();
    let users_repo: Arc<dyn UsersRepo> = Arc::new(MemoryUsersRepo::new());
    let registry = ConnectionRegistry::new(Duration::from_secs(1));
    let chat = ChatroomService::new(
        posts,
        comments.clone(),
        users_repo.clone(),
        CommentTreeFetcher::new(comments.clone(), Duration::from_secs(5)),
        registry.clone(),
        2,
    );
    let users = UsersService::new(users_repo, registry);
    let alice = users
        .create_user("Alice", "north", "alice@example.com")
        .await
        .unwrap();

    let p = chat.create_post(&alice.id, "going away", PostType::Text).await.unwrap();
    let early = chat.comment_on_post(p.id, &alice.id, "early").await.unwrap();
    let late = Comment::new(CommentParent::Post(p.id), &alice, "late".into());
    let late_id = late.id;
    *racing.late.lock() = Some(late);

    chat.delete_post(p.id, &alice.id).await.unwrap();

    for id in [early.id, late_id] {
        assert!(matches!(comments.get(id).await, Err(AppError::NotFound(_))));
    }
    let leftovers = comments
        .list_by_parent(CommentParent::Post(p.id), Pagination::ALL)
        .await
        .unwrap();
    assert_eq!(leftovers.total, 0);
}
