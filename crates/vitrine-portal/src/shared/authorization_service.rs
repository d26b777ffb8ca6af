//! Authorization Service
//!
//! The permission-check algorithm: resolve the user's role, resolve the
//! role's permission set, and answer allow/deny. A role holding the
//! carte-blanche sentinel passes every check; otherwise the required name
//! must match exactly (case-sensitive, no pattern matching).

use std::sync::Arc;

use crate::role::entity::permissions;
use crate::role::repository::RoleRepository;
use crate::shared::error::{PortalError, Result};
use crate::user::repository::UserRepository;

/// Authenticated identity attached to a request by the session middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub username: String,
}

/// Authorization service for checking permissions
pub struct AuthorizationService {
    user_repo: Arc<UserRepository>,
    role_repo: Arc<RoleRepository>,
}

impl AuthorizationService {
    pub fn new(user_repo: Arc<UserRepository>, role_repo: Arc<RoleRepository>) -> Self {
        Self { user_repo, role_repo }
    }

    /// Does this user hold the named permission?
    ///
    /// For a fixed store state this is a pure function of its inputs. Missing
    /// users, users without a role, and deleted roles all answer false.
    pub async fn has_permission(&self, user_id: &str, permission_name: &str) -> Result<bool> {
        let Some(user) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(false);
        };

        let Some(role_id) = user.role_id else {
            return Ok(false);
        };

        let Some(role) = self.role_repo.find_with_permissions(role_id).await? else {
            return Ok(false);
        };

        if role.holds(permissions::CARTE_BLANCHE) {
            return Ok(true);
        }

        Ok(role.holds(permission_name))
    }

    /// Hard gate used by protected routes: deny is an error, not a flag.
    pub async fn require_permission(&self, user_id: &str, permission_name: &str) -> Result<()> {
        if self.has_permission(user_id, permission_name).await? {
            Ok(())
        } else {
            Err(PortalError::forbidden(format!(
                "Missing permission: {}",
                permission_name
            )))
        }
    }

    /// The user's resolved permission names, as stored on the role.
    ///
    /// carte_blanche is reported as the single sentinel name, never expanded
    /// into the full permission table.
    pub async fn permissions_for_user(&self, user_id: &str) -> Result<Vec<String>> {
        let Some(user) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(Vec::new());
        };

        let Some(role_id) = user.role_id else {
            return Ok(Vec::new());
        };

        let Some(role) = self.role_repo.find_with_permissions(role_id).await? else {
            return Ok(Vec::new());
        };

        Ok(role.permissions.into_iter().map(|p| p.name).collect())
    }
}
