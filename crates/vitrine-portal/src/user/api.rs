//! Users Admin API
//!
//! REST endpoints for listing users and reassigning roles, gated by
//! manage_users.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::role::entity::permissions;
use crate::role::repository::RoleRepository;
use crate::shared::authorization_service::AuthorizationService;
use crate::shared::error::PortalError;
use crate::shared::middleware::Authenticated;
use crate::user::entity::UserWithRole;
use crate::user::repository::UserRepository;

/// Role assignment request. A null roleId clears the user's role.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequest {
    pub role_id: Option<i64>,
}

/// Single user response
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: UserWithRole,
}

/// User list response
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserWithRole>,
}

/// Users service state
#[derive(Clone)]
pub struct UsersState {
    pub user_repo: Arc<UserRepository>,
    pub role_repo: Arc<RoleRepository>,
    pub authz: Arc<AuthorizationService>,
}

/// List users with their roles
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    operation_id = "getAdminUsers",
    responses(
        (status = 200, description = "List of users", body = UserListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing manage_users")
    )
)]
pub async fn list_users(
    State(state): State<UsersState>,
    auth: Authenticated,
) -> Result<Json<UserListResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_USERS).await?;

    let users = state.user_repo.find_all_with_roles().await?;
    Ok(Json(UserListResponse { users }))
}

/// Assign or clear a user's role
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    tag = "users",
    operation_id = "putAdminUserRole",
    params(("id" = String, Path, description = "User id")),
    request_body = SetRoleRequest,
    responses(
        (status = 200, description = "Role assigned", body = UserResponse),
        (status = 404, description = "User or role not found")
    )
)]
pub async fn set_user_role(
    State(state): State<UsersState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<SetRoleRequest>,
) -> Result<Json<UserResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_USERS).await?;

    // The reference invariant: an assigned roleId must point at a live role.
    if let Some(role_id) = req.role_id {
        state
            .role_repo
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Role", role_id))?;
    }

    state
        .user_repo
        .set_role(&id, req.role_id)
        .await?
        .ok_or_else(|| PortalError::not_found("User", &id))?;

    let user = state
        .user_repo
        .find_with_role(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("User", &id))?;

    tracing::info!(username = %user.username, role_id = ?req.role_id, "User role updated");

    Ok(Json(UserResponse { user }))
}

/// Create the users router (mounted under /api/admin)
pub fn users_router(state: UsersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(set_user_role))
        .with_state(state)
}
