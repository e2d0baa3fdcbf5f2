use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Reviewed,
    Approved,
    Implemented,
    Rejected,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Reviewed => "reviewed",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Implemented => "implemented",
            SuggestionStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(SuggestionStatus::Pending),
            "reviewed" => Ok(SuggestionStatus::Reviewed),
            "approved" => Ok(SuggestionStatus::Approved),
            "implemented" => Ok(SuggestionStatus::Implemented),
            "rejected" => Ok(SuggestionStatus::Rejected),
            other => Err(AppError::Validation(format!(
                "unknown suggestion status {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Suggestion {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: SuggestionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Suggestion {
    pub fn new(user_id: &str, title: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title,
            description,
            status: SuggestionStatus::Pending,
            admin_notes: None,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
            reviewed_at: None,
        }
    }

    pub fn review(&mut self, reviewer_id: &str, status: SuggestionStatus, notes: Option<String>) {
        let now = Utc::now();
        self.status = status;
        if notes.is_some() {
            self.admin_notes = notes;
        }
        self.reviewed_by = Some(reviewer_id.to_string());
        self.reviewed_at = Some(now);
        self.updated_at = now;
    }
}
