use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    domain::{
        models::{Comment, CommentParent, Information, Post, Role, Suggestion, User},
        traits::{
            CommentsRepo, InformationRepo, LikeToggle, PostsRepo, SuggestionFilter,
            SuggestionsRepo, UserFilter, UsersRepo,
        },
        value_objects::{Page, Pagination},
    },
    error::AppError,
};

#[derive(Default)]
pub struct MemoryPostsRepo {
    inner: RwLock<IndexMap<Uuid, Post>>,
}

impl MemoryPostsRepo {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(IndexMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl PostsRepo for MemoryPostsRepo {
    async fn insert(&self, mut post: Post) -> Result<Post, AppError> {
        // comments are never stored with the post
        post.comments.clear();
        let mut guard = self.inner.write().await;
        if guard.contains_key(&post.id) {
            return Err(AppError::Conflict(format!("post {} already exists", post.id)));
        }
        guard.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get(&self, post_id: Uuid) -> Result<Post, AppError> {
        let guard = self.inner.read().await;
        guard
            .get(&post_id)
            .filter(|post| !post.is_deleted())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))
    }

    async fn list(&self, pagination: Pagination) -> Result<Page<Post>, AppError> {
        let guard = self.inner.read().await;
        // reverse insertion order first so equal timestamps still list newest first
        let mut live: Vec<Post> = guard
            .values()
            .rev()
            .filter(|post| !post.is_deleted())
            .cloned()
            .collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = live.len() as u64;
        Ok(Page::new(pagination.apply(live), total))
    }

    async fn delete(&self, post_id: Uuid) -> Result<(), AppError> {
        let mut guard = self.inner.write().await;
        let post = guard
            .get_mut(&post_id)
            .filter(|post| !post.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))?;
        let now = Utc::now();
        post.deleted_at = Some(now);
        post.updated_at = now;
        Ok(())
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: &str) -> Result<LikeToggle<Post>, AppError> {
        let mut guard = self.inner.write().await;
        let post = guard
            .get_mut(&post_id)
            .filter(|post| !post.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))?;
        let liked = post.toggle_like(user_id);
        Ok(LikeToggle {
            record: post.clone(),
            liked,
        })
    }
}

#[derive(Default)]
pub struct MemoryCommentsRepo {
    inner: RwLock<IndexMap<Uuid, Comment>>,
}

impl MemoryCommentsRepo {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(IndexMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl CommentsRepo for MemoryCommentsRepo {
    async fn insert(&self, mut comment: Comment) -> Result<Comment, AppError> {
        comment.comments.clear();
        let mut guard = self.inner.write().await;
        if guard.contains_key(&comment.id) {
            return Err(AppError::Conflict(format!(
                "comment {} already exists",
                comment.id
            )));
        }
        guard.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn get(&self, comment_id: Uuid) -> Result<Comment, AppError> {
        let guard = self.inner.read().await;
        guard
            .get(&comment_id)
            .filter(|comment| !comment.is_deleted())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id} not found")))
    }

    async fn list_by_parent(
        &self,
        parent: CommentParent,
        pagination: Pagination,
    ) -> Result<Page<Comment>, AppError> {
        let guard = self.inner.read().await;
        let mut children: Vec<Comment> = guard
            .values()
            .filter(|comment| !comment.is_deleted() && comment.parent() == parent)
            .cloned()
            .collect();
        // stable: ties keep insertion order
        children.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let total = children.len() as u64;
        Ok(Page::new(pagination.apply(children), total))
    }

    async fn delete_many(&self, comment_ids: &[Uuid]) -> Result<u64, AppError> {
        let mut guard = self.inner.write().await;
        let now = Utc::now();
        let mut deleted = 0;
        for comment_id in comment_ids {
            if let Some(comment) = guard.get_mut(comment_id) {
                if comment.is_deleted() {
                    continue;
                }
                comment.deleted_at = Some(now);
                comment.updated_at = now;
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn toggle_like(
        &self,
        comment_id: Uuid,
        user_id: &str,
    ) -> Result<LikeToggle<Comment>, AppError> {
        let mut guard = self.inner.write().await;
        let comment = guard
            .get_mut(&comment_id)
            .filter(|comment| !comment.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id} not found")))?;
        let liked = comment.toggle_like(user_id);
        Ok(LikeToggle {
            record: comment.clone(),
            liked,
        })
    }
}

#[derive(Default)]
pub struct MemoryUsersRepo {
    inner: RwLock<IndexMap<String, User>>,
}

impl MemoryUsersRepo {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(IndexMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl UsersRepo for MemoryUsersRepo {
    async fn insert(&self, user: User) -> Result<User, AppError> {
        let mut guard = self.inner.write().await;
        if guard.contains_key(&user.id) {
            return Err(AppError::Conflict(format!("user {} already exists", user.id)));
        }
        if guard.values().any(|existing| existing.contact == user.contact) {
            return Err(AppError::Conflict(format!(
                "contact {} already registered",
                user.contact
            )));
        }
        guard.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get(&self, user_id: &str) -> Result<User, AppError> {
        let guard = self.inner.read().await;
        guard
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))
    }

    async fn find_by_contact(&self, contact: &str) -> Result<Option<User>, AppError> {
        let guard = self.inner.read().await;
        Ok(guard.values().find(|user| user.contact == contact).cloned())
    }

    async fn set_role(&self, user_id: &str, role: Role) -> Result<User, AppError> {
        let mut guard = self.inner.write().await;
        let entry = guard
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;
        entry.role = role;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn set_active(&self, user_id: &str, active: bool) -> Result<User, AppError> {
        let mut guard = self.inner.write().await;
        let entry = guard
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;
        entry.active = active;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn list(&self, filter: UserFilter, pagination: Pagination) -> Result<Page<User>, AppError> {
        let guard = self.inner.read().await;
        let mut matching: Vec<User> = guard
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let total = matching.len() as u64;
        Ok(Page::new(pagination.apply(matching), total))
    }
}

#[derive(Default)]
pub struct MemoryInformationRepo {
    inner: RwLock<IndexMap<Uuid, Information>>,
}

impl MemoryInformationRepo {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(IndexMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl InformationRepo for MemoryInformationRepo {
    async fn insert(&self, info: Information) -> Result<Information, AppError> {
        let mut guard = self.inner.write().await;
        if guard.contains_key(&info.id) {
            return Err(AppError::Conflict(format!("information {} already exists", info.id)));
        }
        guard.insert(info.id, info.clone());
        Ok(info)
    }

    async fn get(&self, info_id: Uuid) -> Result<Information, AppError> {
        let guard = self.inner.read().await;
        guard
            .get(&info_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("information {info_id} not found")))
    }

    async fn update(&self, info: Information) -> Result<Information, AppError> {
        let mut guard = self.inner.write().await;
        let entry = guard
            .get_mut(&info.id)
            .ok_or_else(|| AppError::NotFound(format!("information {} not found", info.id)))?;
        *entry = info.clone();
        Ok(info)
    }

    async fn delete(&self, info_id: Uuid) -> Result<(), AppError> {
        let mut guard = self.inner.write().await;
        guard
            .shift_remove(&info_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("information {info_id} not found")))
    }

    async fn list(
        &self,
        published_only: bool,
        pagination: Pagination,
    ) -> Result<Page<Information>, AppError> {
        let guard = self.inner.read().await;
        let mut items: Vec<Information> = guard
            .values()
            .rev()
            .filter(|info| !published_only || info.published)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len() as u64;
        Ok(Page::new(pagination.apply(items), total))
    }
}

#[derive(Default)]
pub struct MemorySuggestionsRepo {
    inner: RwLock<IndexMap<Uuid, Suggestion>>,
}

impl MemorySuggestionsRepo {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(IndexMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl SuggestionsRepo for MemorySuggestionsRepo {
    async fn insert(&self, suggestion: Suggestion) -> Result<Suggestion, AppError> {
        let mut guard = self.inner.write().await;
        if guard.contains_key(&suggestion.id) {
            return Err(AppError::Conflict(format!(
                "suggestion {} already exists",
                suggestion.id
            )));
        }
        guard.insert(suggestion.id, suggestion.clone());
        Ok(suggestion)
    }

    async fn get(&self, suggestion_id: Uuid) -> Result<Suggestion, AppError> {
        let guard = self.inner.read().await;
        guard
            .get(&suggestion_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("suggestion {suggestion_id} not found")))
    }

    async fn update(&self, suggestion: Suggestion) -> Result<Suggestion, AppError> {
        let mut guard = self.inner.write().await;
        let entry = guard.get_mut(&suggestion.id).ok_or_else(|| {
            AppError::NotFound(format!("suggestion {} not found", suggestion.id))
        })?;
        *entry = suggestion.clone();
        Ok(suggestion)
    }

    async fn delete(&self, suggestion_id: Uuid) -> Result<(), AppError> {
        let mut guard = self.inner.write().await;
        guard
            .shift_remove(&suggestion_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("suggestion {suggestion_id} not found")))
    }

    async fn list(
        &self,
        filter: SuggestionFilter,
        pagination: Pagination,
    ) -> Result<Page<Suggestion>, AppError> {
        let guard = self.inner.read().await;
        let mut items: Vec<Suggestion> = guard
            .values()
            .rev()
            .filter(|suggestion| filter.matches(suggestion))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len() as u64;
        Ok(Page::new(pagination.apply(items), total))
    }
}
