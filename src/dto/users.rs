use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    models::{Role, User},
    value_objects::{Page, Pagination},
};

use super::page_meta;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub province: String,
    pub contact: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub province: String,
    pub contact: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            province: value.province,
            contact: value.contact,
            role: value.role,
            active: value.active,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersPageResponse {
    pub users: Vec<UserResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl UsersPageResponse {
    pub fn new(page: Page<User>, pagination: Pagination) -> Self {
        let (page_no, limit, total_pages) = page_meta(page.total, pagination);
        Self {
            users: page.items.into_iter().map(UserResponse::from).collect(),
            total: page.total,
            page: page_no,
            limit,
            total_pages,
        }
    }
}
