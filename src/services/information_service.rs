use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    domain::{
        models::{Information, InformationType},
        traits::{InformationRepo, UsersRepo},
        value_objects::{required_text, Page, Pagination},
    },
    error::AppError,
};

use super::{load_admin, ServiceResult};

#[derive(Debug, Clone, Default)]
pub struct NewInformation {
    pub title: String,
    pub content: String,
    pub info_type: InformationType,
    pub attachments: Vec<String>,
    pub published: bool,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct InformationPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub info_type: Option<InformationType>,
    pub attachments: Option<Vec<String>>,
    pub published: Option<bool>,
}

/// Admin announcements. Drafts are invisible to everyone but admins.
pub struct InformationService {
    info: Arc<dyn InformationRepo>,
    users: Arc<dyn UsersRepo>,
}

impl InformationService {
    pub fn new(info: Arc<dyn InformationRepo>, users: Arc<dyn UsersRepo>) -> Self {
        Self { info, users }
    }

    #[instrument(skip(self, input))]
    pub async fn create_information(
        &self,
        admin_id: &str,
        input: NewInformation,
    ) -> ServiceResult<Information> {
        load_admin(self.users.as_ref(), admin_id).await?;
        let title = required_text("title", &input.title)?;
        let content = required_text("content", &input.content)?;

        let mut record = Information::new(
            admin_id,
            title,
            content,
            input.info_type,
            clean_attachments(input.attachments),
        );
        record.set_published(input.published);
        let record = self.info.insert(record).await?;
        info!(info_id = %record.id, published = record.published, "information created");
        Ok(record)
    }

    pub async fn get_information(&self, viewer_id: &str, info_id: Uuid) -> ServiceResult<Information> {
        let viewer = self.users.get(viewer_id).await?;
        let record = self.info.get(info_id).await?;
        if !record.published && !viewer.is_admin() {
            return Err(AppError::NotFound(format!("information {info_id} not found")));
        }
        Ok(record)
    }

    pub async fn list_information(
        &self,
        viewer_id: &str,
        pagination: Pagination,
    ) -> ServiceResult<Page<Information>> {
        let viewer = self.users.get(viewer_id).await?;
        self.info.list(!viewer.is_admin(), pagination).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_information(
        &self,
        admin_id: &str,
        info_id: Uuid,
        patch: InformationPatch,
    ) -> ServiceResult<Information> {
        load_admin(self.users.as_ref(), admin_id).await?;
        let mut record = self.info.get(info_id).await?;

        if let Some(title) = patch.title {
            record.title = required_text("title", &title)?;
        }
        if let Some(content) = patch.content {
            record.content = required_text("content", &content)?;
        }
        if let Some(info_type) = patch.info_type {
            record.info_type = info_type;
        }
        if let Some(attachments) = patch.attachments {
            record.attachments = clean_attachments(attachments);
        }
        if let Some(published) = patch.published {
            record.set_published(published);
        }
        record.updated_at = Utc::now();

        let record = self.info.update(record).await?;
        info!(info_id = %record.id, "information updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete_information(&self, admin_id: &str, info_id: Uuid) -> ServiceResult<()> {
        load_admin(self.users.as_ref(), admin_id).await?;
        self.info.delete(info_id).await?;
        info!(info_id = %info_id, "information deleted");
        Ok(())
    }
}

fn clean_attachments(attachments: Vec<String>) -> Vec<String> {
    attachments
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}
