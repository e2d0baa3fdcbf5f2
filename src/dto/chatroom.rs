use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    models::{Comment, Post, PostType},
    value_objects::{Page, Pagination},
};

use super::page_meta;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(rename = "type", default)]
    pub post_type: PostType,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// `limit=0` returns the whole listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn pagination(&self, default_limit: u64) -> Pagination {
        Pagination::new(self.page.unwrap_or(1), self.limit.unwrap_or(default_limit))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostsPageResponse {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl PostsPageResponse {
    pub fn new(page: Page<Post>, pagination: Pagination) -> Self {
        let (page_no, limit, total_pages) = page_meta(page.total, pagination);
        Self {
            posts: page.items,
            total: page.total,
            page: page_no,
            limit,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPageResponse {
    pub comments: Vec<Comment>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl CommentsPageResponse {
    pub fn new(page: Page<Comment>, pagination: Pagination) -> Self {
        let (page_no, limit, total_pages) = page_meta(page.total, pagination);
        Self {
            comments: page.items,
            total: page.total,
            page: page_no,
            limit,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentTotalResponse {
    pub total: u64,
    pub window_hours: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub connections: usize,
    pub connected_users: usize,
}
