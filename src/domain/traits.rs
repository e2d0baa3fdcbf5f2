use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    domain::{
        models::{
            Comment, CommentParent, Information, Post, Role, Suggestion, SuggestionStatus, User,
        },
        value_objects::{Page, Pagination},
    },
    error::AppError,
};

/// Outcome of an atomic like toggle.
#[derive(Debug, Clone)]
pub struct LikeToggle<T> {
    pub record: T,
    /// `true` when the user now likes the record, `false` when the like was removed.
    pub liked: bool,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn insert(&self, post: Post) -> Result<Post, AppError>;
    /// Soft-deleted posts are reported as not found.
    async fn get(&self, post_id: Uuid) -> Result<Post, AppError>;
    /// Newest first.
    async fn list(&self, pagination: Pagination) -> Result<Page<Post>, AppError>;
    async fn delete(&self, post_id: Uuid) -> Result<(), AppError>;
    /// Membership test and mutation happen under a single write, so two
    /// concurrent toggles by the same user never both add.
    async fn toggle_like(&self, post_id: Uuid, user_id: &str) -> Result<LikeToggle<Post>, AppError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<Comment, AppError>;
    async fn get(&self, comment_id: Uuid) -> Result<Comment, AppError>;
    /// Direct children of `parent`, oldest first. `Pagination::ALL` returns
    /// every child.
    async fn list_by_parent(
        &self,
        parent: CommentParent,
        pagination: Pagination,
    ) -> Result<Page<Comment>, AppError>;
    /// Soft-deletes every listed comment. Returns how many were live.
    async fn delete_many(&self, comment_ids: &[Uuid]) -> Result<u64, AppError>;
    async fn toggle_like(
        &self,
        comment_id: Uuid,
        user_id: &str,
    ) -> Result<LikeToggle<Comment>, AppError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, AppError>;
    async fn get(&self, user_id: &str) -> Result<User, AppError>;
    async fn find_by_contact(&self, contact: &str) -> Result<Option<User>, AppError>;
    async fn set_role(&self, user_id: &str, role: Role) -> Result<User, AppError>;
    async fn set_active(&self, user_id: &str, active: bool) -> Result<User, AppError>;
    /// Matching users, oldest account first.
    async fn list(&self, filter: UserFilter, pagination: Pagination) -> Result<Page<User>, AppError>;
}

/// `None` fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.role.map_or(true, |role| user.role == role)
            && self.active.map_or(true, |active| user.active == active)
    }
}

#[async_trait]
pub trait InformationRepo: Send + Sync {
    async fn insert(&self, info: Information) -> Result<Information, AppError>;
    async fn get(&self, info_id: Uuid) -> Result<Information, AppError>;
    /// Replaces the stored record with the same id.
    async fn update(&self, info: Information) -> Result<Information, AppError>;
    async fn delete(&self, info_id: Uuid) -> Result<(), AppError>;
    /// Newest first. `published_only` hides drafts.
    async fn list(
        &self,
        published_only: bool,
        pagination: Pagination,
    ) -> Result<Page<Information>, AppError>;
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionFilter {
    pub user_id: Option<String>,
    pub status: Option<SuggestionStatus>,
}

impl SuggestionFilter {
    pub fn matches(&self, suggestion: &Suggestion) -> bool {
        self.user_id
            .as_deref()
            .map_or(true, |user_id| suggestion.user_id == user_id)
            && self.status.map_or(true, |status| suggestion.status == status)
    }
}

#[async_trait]
pub trait SuggestionsRepo: Send + Sync {
    async fn insert(&self, suggestion: Suggestion) -> Result<Suggestion, AppError>;
    async fn get(&self, suggestion_id: Uuid) -> Result<Suggestion, AppError>;
    async fn update(&self, suggestion: Suggestion) -> Result<Suggestion, AppError>;
    async fn delete(&self, suggestion_id: Uuid) -> Result<(), AppError>;
    /// Newest first.
    async fn list(
        &self,
        filter: SuggestionFilter,
        pagination: Pagination,
    ) -> Result<Page<Suggestion>, AppError>;
}

/// One live duplex channel as seen by the connection registry.
///
/// `id` is the identity used for removal; two connections never share it.
#[async_trait]
pub trait Connection: Send + Sync {
    fn id(&self) -> Uuid;
    async fn send_text(&self, text: &str) -> Result<(), AppError>;
    /// Closes the transport. Calling it twice is harmless.
    async fn close(&self);
}
