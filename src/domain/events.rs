use serde::Serialize;
use uuid::Uuid;

use crate::domain::models::{Comment, CommentParent, Post, ReferenceKind};

/// State change pushed to every connected client.
///
/// Serialized as `{"type": <tag>, "payload": {...}}`, one event per frame.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ChatEvent {
    NewPost(Post),
    DeletePost {
        #[serde(rename = "postID")]
        post_id: Uuid,
    },
    NewComment(NewCommentPayload),
    DeleteComment {
        #[serde(rename = "commentID")]
        comment_id: Uuid,
        reference_id: Uuid,
    },
    LikePost {
        post: Post,
        #[serde(rename = "postID")]
        post_id: Uuid,
        #[serde(rename = "userID")]
        user_id: String,
        liked: bool,
    },
    LikeComment {
        #[serde(rename = "commentID")]
        comment_id: Uuid,
        reference: ReferenceKind,
        reference_id: Uuid,
        #[serde(rename = "userID")]
        user_id: String,
        liked: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCommentPayload {
    pub comment: Comment,
    #[serde(rename = "postID", skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    #[serde(rename = "referenceId", skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<Uuid>,
}

impl ChatEvent {
    pub fn new_comment(comment: Comment) -> Self {
        let (post_id, reference_id) = match comment.parent() {
            CommentParent::Post(id) => (Some(id), None),
            CommentParent::Comment(id) => (None, Some(id)),
        };
        ChatEvent::NewComment(NewCommentPayload {
            comment,
            post_id,
            reference_id,
        })
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            ChatEvent::NewPost(_) => "new_post",
            ChatEvent::DeletePost { .. } => "delete_post",
            ChatEvent::NewComment(_) => "new_comment",
            ChatEvent::DeleteComment { .. } => "delete_comment",
            ChatEvent::LikePost { .. } => "like_post",
            ChatEvent::LikeComment { .. } => "like_comment",
        }
    }
}
