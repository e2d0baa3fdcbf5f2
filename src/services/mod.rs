use crate::{
    domain::{models::User, traits::UsersRepo},
    error::AppError,
};

pub type ServiceResult<T> = Result<T, AppError>;

pub mod chatroom_service;
pub mod comment_tree;
pub mod information_service;
pub mod suggestion_service;
pub mod users_service;

pub use chatroom_service::ChatroomService;
pub use information_service::InformationService;
pub use suggestion_service::SuggestionService;
pub use users_service::UsersService;

/// Loads the actor and fails unless they are an admin.
pub(crate) async fn load_admin(users: &dyn UsersRepo, user_id: &str) -> ServiceResult<User> {
    let actor = users.get(user_id).await?;
    if !actor.is_admin() {
        return Err(AppError::PermissionDenied(format!(
            "user {user_id} is not an admin"
        )));
    }
    Ok(actor)
}
