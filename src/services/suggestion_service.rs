use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    domain::{
        models::{Suggestion, SuggestionStatus, User},
        traits::{SuggestionFilter, SuggestionsRepo, UsersRepo},
        value_objects::{required_text, Page, Pagination},
    },
    error::AppError,
};

use super::{load_admin, ServiceResult};

pub struct SuggestionService {
    suggestions: Arc<dyn SuggestionsRepo>,
    users: Arc<dyn UsersRepo>,
}

impl SuggestionService {
    pub fn new(suggestions: Arc<dyn SuggestionsRepo>, users: Arc<dyn UsersRepo>) -> Self {
        Self { suggestions, users }
    }

    #[instrument(skip(self, title, description))]
    pub async fn create_suggestion(
        &self,
        user_id: &str,
        title: &str,
        description: &str,
    ) -> ServiceResult<Suggestion> {
        let title = required_text("title", title)?;
        let description = required_text("description", description)?;
        let author = self.users.get(user_id).await?;

        let suggestion = self
            .suggestions
            .insert(Suggestion::new(&author.id, title, description))
            .await?;
        info!(suggestion_id = %suggestion.id, "suggestion created");
        Ok(suggestion)
    }

    pub async fn list_my_suggestions(
        &self,
        user_id: &str,
        pagination: Pagination,
    ) -> ServiceResult<Page<Suggestion>> {
        let filter = SuggestionFilter {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        };
        self.suggestions.list(filter, pagination).await
    }

    pub async fn list_suggestions(
        &self,
        admin_id: &str,
        status: Option<SuggestionStatus>,
        pagination: Pagination,
    ) -> ServiceResult<Page<Suggestion>> {
        load_admin(self.users.as_ref(), admin_id).await?;
        let filter = SuggestionFilter {
            status,
            ..Default::default()
        };
        self.suggestions.list(filter, pagination).await
    }

    pub async fn get_suggestion(&self, actor_id: &str, suggestion_id: Uuid) -> ServiceResult<Suggestion> {
        let actor = self.users.get(actor_id).await?;
        let suggestion = self.suggestions.get(suggestion_id).await?;
        ensure_owner_or_admin(&actor, &suggestion)?;
        Ok(suggestion)
    }

    #[instrument(skip(self, admin_notes))]
    pub async fn update_suggestion_status(
        &self,
        admin_id: &str,
        suggestion_id: Uuid,
        status: SuggestionStatus,
        admin_notes: Option<String>,
    ) -> ServiceResult<Suggestion> {
        let admin = load_admin(self.users.as_ref(), admin_id).await?;
        let mut suggestion = self.suggestions.get(suggestion_id).await?;

        let notes = admin_notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());
        suggestion.review(&admin.id, status, notes);

        let suggestion = self.suggestions.update(suggestion).await?;
        info!(suggestion_id = %suggestion.id, status = %suggestion.status, "suggestion reviewed");
        Ok(suggestion)
    }

    #[instrument(skip(self))]
    pub async fn delete_suggestion(&self, actor_id: &str, suggestion_id: Uuid) -> ServiceResult<()> {
        let actor = self.users.get(actor_id).await?;
        let suggestion = self.suggestions.get(suggestion_id).await?;
        ensure_owner_or_admin(&actor, &suggestion)?;
        self.suggestions.delete(suggestion_id).await?;
        info!(suggestion_id = %suggestion_id, "suggestion deleted");
        Ok(())
    }
}

fn ensure_owner_or_admin(actor: &User, suggestion: &Suggestion) -> ServiceResult<()> {
    if actor.can_moderate(&suggestion.user_id) {
        return Ok(());
    }
    Err(AppError::PermissionDenied(format!(
        "user {} may not access suggestion {}",
        actor.id, suggestion.id
    )))
}
