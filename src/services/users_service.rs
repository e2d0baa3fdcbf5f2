use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    domain::{
        models::{Role, User},
        traits::{UserFilter, UsersRepo},
        value_objects::{required_text, Page, Pagination},
    },
    error::AppError,
    infra::ws::broadcaster::ConnectionRegistry,
};

use super::{load_admin, ServiceResult};

pub struct UsersService {
    users: Arc<dyn UsersRepo>,
    registry: ConnectionRegistry,
}

impl UsersService {
    pub fn new(users: Arc<dyn UsersRepo>, registry: ConnectionRegistry) -> Self {
        Self { users, registry }
    }

    #[instrument(skip(self, contact))]
    pub async fn create_user(
        &self,
        name: &str,
        province: &str,
        contact: &str,
    ) -> ServiceResult<User> {
        let name = required_text("name", name)?;
        let province = required_text("province", province)?;
        let contact = required_text("contact", contact)?;

        if self.users.find_by_contact(&contact).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "contact {contact} already registered"
            )));
        }

        let user = self
            .users
            .insert(new_user(name, province, contact, Role::User))
            .await?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> ServiceResult<User> {
        self.users.get(user_id).await
    }

    /// Resolves the caller behind a request. Unknown ids are unauthorized,
    /// banned users are forbidden.
    pub async fn authenticate(&self, user_id: &str) -> ServiceResult<User> {
        let user = match self.users.get(user_id).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Unauthorized(format!("unknown user {user_id}")))
            }
            Err(err) => return Err(err),
        };
        if !user.active {
            return Err(AppError::PermissionDenied(format!(
                "user {user_id} is banned"
            )));
        }
        Ok(user)
    }

    /// Deactivates the user and drops every live connection they hold.
    #[instrument(skip(self))]
    pub async fn ban_user(&self, admin_id: &str, user_id: &str) -> ServiceResult<User> {
        self.ensure_admin(admin_id).await?;
        if admin_id == user_id {
            return Err(AppError::Validation("admins cannot ban themselves".into()));
        }
        let target = self.users.get(user_id).await?;
        if !target.active {
            return Err(AppError::Conflict(format!("user {user_id} is already banned")));
        }
        let user = self.users.set_active(user_id, false).await?;
        let dropped = self.registry.disconnect_user(user_id).await;
        info!(user_id, dropped, "user banned");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn unban_user(&self, admin_id: &str, user_id: &str) -> ServiceResult<User> {
        self.ensure_admin(admin_id).await?;
        let target = self.users.get(user_id).await?;
        if target.active {
            return Err(AppError::Conflict(format!("user {user_id} is not banned")));
        }
        let user = self.users.set_active(user_id, true).await?;
        info!(user_id, "user unbanned");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn promote_to_admin(&self, admin_id: &str, user_id: &str) -> ServiceResult<User> {
        self.ensure_admin(admin_id).await?;
        let target = self.users.get(user_id).await?;
        if target.is_admin() {
            return Err(AppError::Conflict(format!("user {user_id} is already an admin")));
        }
        let user = self.users.set_role(user_id, Role::Admin).await?;
        info!(user_id, "user promoted to admin");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn demote_from_admin(&self, admin_id: &str, user_id: &str) -> ServiceResult<User> {
        self.ensure_admin(admin_id).await?;
        if admin_id == user_id {
            return Err(AppError::Validation("admins cannot demote themselves".into()));
        }
        let target = self.users.get(user_id).await?;
        if !target.is_admin() {
            return Err(AppError::Conflict(format!("user {user_id} is not an admin")));
        }
        let user = self.users.set_role(user_id, Role::User).await?;
        info!(user_id, "admin demoted");
        Ok(user)
    }

    pub async fn list_banned_users(
        &self,
        admin_id: &str,
        pagination: Pagination,
    ) -> ServiceResult<Page<User>> {
        self.ensure_admin(admin_id).await?;
        let filter = UserFilter {
            active: Some(false),
            ..Default::default()
        };
        self.users.list(filter, pagination).await
    }

    pub async fn list_admin_users(
        &self,
        admin_id: &str,
        pagination: Pagination,
    ) -> ServiceResult<Page<User>> {
        self.ensure_admin(admin_id).await?;
        let filter = UserFilter {
            role: Some(Role::Admin),
            ..Default::default()
        };
        self.users.list(filter, pagination).await
    }

    /// Creates the startup admin, or returns it when a previous call already did.
    pub async fn bootstrap_admin(&self, name: &str) -> ServiceResult<User> {
        let name = required_text("name", name)?;
        let contact = format!("bootstrap:{name}");
        if let Some(existing) = self.users.find_by_contact(&contact).await? {
            return Ok(existing);
        }
        let admin = self
            .users
            .insert(new_user(name, "-".to_string(), contact, Role::Admin))
            .await?;
        info!(user_id = %admin.id, name = %admin.name, "bootstrap admin created");
        Ok(admin)
    }

    async fn ensure_admin(&self, admin_id: &str) -> ServiceResult<User> {
        load_admin(self.users.as_ref(), admin_id).await
    }
}

fn new_user(name: String, province: String, contact: String, role: Role) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4().to_string(),
        name,
        province,
        contact,
        role,
        active: true,
        created_at: now,
        updated_at: now,
    }
}
