use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub mod information;
pub mod reference;
pub mod suggestion;

pub use information::{Information, InformationType};
pub use reference::{CommentParent, ReferenceKind};
pub use suggestion::{Suggestion, SuggestionStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub province: String,
    pub contact: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Authors may always moderate their own content; admins may moderate anything.
    pub fn can_moderate(&self, author_id: &str) -> bool {
        self.is_admin() || self.id == author_id
    }

    pub fn as_author(&self) -> Author {
        Author {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Text,
    Image,
    Video,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub user_id: String,
    pub author: Author,
    pub content: String,
    #[serde(rename = "type", default)]
    pub post_type: PostType,
    /// Populated at read time by the comment-tree fetcher; never stored.
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes: u64,
    #[serde(rename = "likeduserid", default)]
    #[schema(value_type = Vec<String>)]
    pub liked_user_ids: IndexSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(author: &User, content: String, post_type: PostType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: author.id.clone(),
            author: author.as_author(),
            content,
            post_type,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
            likes: 0,
            liked_user_ids: IndexSet::new(),
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Adds or removes `user_id` from the liking set. Returns `true` when the
    /// post ends up liked by the user.
    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        let liked = toggle_membership(&mut self.likes, &mut self.liked_user_ids, user_id);
        self.updated_at = Utc::now();
        liked
    }

    /// Number of comments and replies currently attached to the post.
    pub fn thread_size(&self) -> usize {
        self.comments.iter().map(Comment::thread_size).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub reference: ReferenceKind,
    pub reference_id: Uuid,
    pub user_id: String,
    pub author: Author,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes: u64,
    #[serde(rename = "likeduserid", default)]
    #[schema(value_type = Vec<String>)]
    pub liked_user_ids: IndexSet<String>,
    /// Replies, populated at read time.
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(parent: CommentParent, author: &User, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            reference: parent.kind(),
            reference_id: parent.id(),
            user_id: author.id.clone(),
            author: author.as_author(),
            content,
            created_at: now,
            updated_at: now,
            likes: 0,
            liked_user_ids: IndexSet::new(),
            comments: Vec::new(),
            deleted_at: None,
        }
    }

    pub fn parent(&self) -> CommentParent {
        CommentParent::new(self.reference, self.reference_id)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        let liked = toggle_membership(&mut self.likes, &mut self.liked_user_ids, user_id);
        self.updated_at = Utc::now();
        liked
    }

    /// This comment plus every nested reply.
    pub fn thread_size(&self) -> usize {
        1 + self.comments.iter().map(Comment::thread_size).sum::<usize>()
    }
}

fn toggle_membership(likes: &mut u64, users: &mut IndexSet<String>, user_id: &str) -> bool {
    if users.shift_remove(user_id) {
        *likes = likes.saturating_sub(1);
        false
    } else {
        users.insert(user_id.to_string());
        *likes += 1;
        true
    }
}
