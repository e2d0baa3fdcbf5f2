use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InformationType {
    #[default]
    News,
    Event,
    Announcement,
}

/// An admin-authored notice shown to every user once published.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Information {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub info_type: InformationType,
    pub author_id: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Information {
    pub fn new(
        author_id: &str,
        title: String,
        content: String,
        info_type: InformationType,
        attachments: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            info_type,
            author_id: author_id.to_string(),
            attachments,
            published: false,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    /// Flips visibility. `published_at` follows the flag; re-publishing an
    /// already published item keeps its original stamp.
    pub fn set_published(&mut self, published: bool) {
        if published && !self.published {
            self.published_at = Some(Utc::now());
        } else if !published {
            self.published_at = None;
        }
        self.published = published;
    }
}
