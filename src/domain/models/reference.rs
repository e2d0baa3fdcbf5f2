use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Discriminates what a comment hangs off: a post or another comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Post,
    Comment,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Post => "post",
            ReferenceKind::Comment => "comment",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parent of a comment, as used by listing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentParent {
    Post(Uuid),
    Comment(Uuid),
}

impl CommentParent {
    pub fn new(kind: ReferenceKind, id: Uuid) -> Self {
        match kind {
            ReferenceKind::Post => CommentParent::Post(id),
            ReferenceKind::Comment => CommentParent::Comment(id),
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        match self {
            CommentParent::Post(_) => ReferenceKind::Post,
            CommentParent::Comment(_) => ReferenceKind::Comment,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            CommentParent::Post(id) | CommentParent::Comment(id) => *id,
        }
    }
}

impl fmt::Display for CommentParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}
