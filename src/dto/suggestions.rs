use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    models::{Suggestion, SuggestionStatus},
    value_objects::{Page, Pagination},
};

use super::page_meta;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSuggestionRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSuggestionStatusRequest {
    pub status: SuggestionStatus,
    #[serde(default, alias = "admin_notes")]
    pub admin_notes: Option<String>,
}

/// Admin listing query. `status` is optional; paging follows `PageQuery`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionQuery {
    pub status: Option<SuggestionStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl SuggestionQuery {
    pub fn pagination(&self, default_limit: u64) -> Pagination {
        Pagination::new(self.page.unwrap_or(1), self.limit.unwrap_or(default_limit))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsPageResponse {
    pub suggestions: Vec<Suggestion>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl SuggestionsPageResponse {
    pub fn new(page: Page<Suggestion>, pagination: Pagination) -> Self {
        let (page_no, limit, total_pages) = page_meta(page.total, pagination);
        Self {
            suggestions: page.items,
            total: page.total,
            page: page_no,
            limit,
            total_pages,
        }
    }
}
