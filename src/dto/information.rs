use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        models::{Information, InformationType},
        value_objects::{Page, Pagination},
    },
    services::information_service::{InformationPatch, NewInformation},
};

use super::page_meta;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInformationRequest {
    pub title: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub info_type: InformationType,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

impl From<CreateInformationRequest> for NewInformation {
    fn from(value: CreateInformationRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            info_type: value.info_type,
            attachments: value.attachments,
            published: value.published,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateInformationRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub info_type: Option<InformationType>,
    pub attachments: Option<Vec<String>>,
    pub published: Option<bool>,
}

impl From<UpdateInformationRequest> for InformationPatch {
    fn from(value: UpdateInformationRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            info_type: value.info_type,
            attachments: value.attachments,
            published: value.published,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InformationPageResponse {
    pub information: Vec<Information>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl InformationPageResponse {
    pub fn new(page: Page<Information>, pagination: Pagination) -> Self {
        let (page_no, limit, total_pages) = page_meta(page.total, pagination);
        Self {
            information: page.items,
            total: page.total,
            page: page_no,
            limit,
            total_pages,
        }
    }
}
