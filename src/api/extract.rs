use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{app::bootstrap::AppState, domain::models::User, error::AppError};

pub const USER_ID_HEADER: &str = "x-user-id";

/// The active user making the request, resolved from the `X-User-Id` header.
pub struct ActingUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for ActingUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Unauthorized("missing X-User-Id header".into()))?;

        let user = state.users_service.authenticate(user_id).await?;
        Ok(ActingUser(user))
    }
}
