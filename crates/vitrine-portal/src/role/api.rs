//! Roles Admin API
//!
//! REST endpoints for role and permission management. Every handler is
//! gated by the session extractor first and a manage_roles permission check
//! second; a request failing either gate never reaches the repositories.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::role::entity::{permissions, Permission, Role};
use crate::role::repository::{PermissionRepository, RoleRepository};
use crate::shared::api_common::SuccessResponse;
use crate::shared::authorization_service::AuthorizationService;
use crate::shared::error::PortalError;
use crate::shared::middleware::Authenticated;

/// Create role request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Update role request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Single role response
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    pub role: Role,
}

/// Role list response
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleListResponse {
    pub roles: Vec<Role>,
}

/// Permission list response
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionListResponse {
    pub permissions: Vec<Permission>,
}

/// Roles service state
#[derive(Clone)]
pub struct RolesState {
    pub role_repo: Arc<RoleRepository>,
    pub permission_repo: Arc<PermissionRepository>,
    pub authz: Arc<AuthorizationService>,
}

/// Reject a name already held by a different role.
async fn ensure_name_free(
    role_repo: &RoleRepository,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<(), PortalError> {
    if let Some(existing) = role_repo.find_by_name(name).await? {
        if exclude_id != Some(existing.id) {
            return Err(PortalError::duplicate("Role", "name", name));
        }
    }
    Ok(())
}

/// List roles
#[utoipa::path(
    get,
    path = "/roles",
    tag = "roles",
    operation_id = "getAdminRoles",
    responses(
        (status = 200, description = "List of roles", body = RoleListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing manage_roles")
    )
)]
pub async fn list_roles(
    State(state): State<RolesState>,
    auth: Authenticated,
) -> Result<Json<RoleListResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_ROLES).await?;

    let roles = state.role_repo.find_all().await?;
    Ok(Json(RoleListResponse { roles }))
}

/// Create a new role
#[utoipa::path(
    post,
    path = "/roles",
    tag = "roles",
    operation_id = "postAdminRoles",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Role created", body = RoleResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Role name already in use")
    )
)]
pub async fn create_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Json(req): Json<CreateRoleRequest>,
) -> Result<Json<RoleResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_ROLES).await?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(PortalError::validation("Role name cannot be empty"));
    }

    ensure_name_free(&state.role_repo, name, None).await?;

    let role = state.role_repo.insert(name, req.description.as_deref()).await?;

    tracing::info!(role = %role.name, id = role.id, "Role created");

    Ok(Json(RoleResponse { role }))
}

/// Update role
#[utoipa::path(
    put,
    path = "/roles/{id}",
    tag = "roles",
    operation_id = "putAdminRolesById",
    params(("id" = i64, Path, description = "Role id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role name already in use")
    )
)]
pub async fn update_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<RoleResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_ROLES).await?;

    if let Some(ref name) = req.name {
        if name.trim().is_empty() {
            return Err(PortalError::validation("Role name cannot be empty"));
        }
        ensure_name_free(&state.role_repo, name.trim(), Some(id)).await?;
    }

    let role = state
        .role_repo
        .update(id, req.name.as_deref().map(str::trim), req.description.as_deref())
        .await?
        .ok_or_else(|| PortalError::not_found("Role", id))?;

    Ok(Json(RoleResponse { role }))
}

/// Delete role
///
/// Removes the role, its permission associations, and detaches any users
/// still pointing at it, as one atomic unit.
#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = "roles",
    operation_id = "deleteAdminRolesById",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role deleted", body = SuccessResponse),
        (status = 404, description = "Role not found")
    )
)]
pub async fn delete_role(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_ROLES).await?;

    if !state.role_repo.delete(id).await? {
        return Err(PortalError::not_found("Role", id));
    }

    tracing::info!(id, "Role deleted");

    Ok(Json(SuccessResponse::ok()))
}

/// List a role's permissions
#[utoipa::path(
    get,
    path = "/roles/{id}/permissions",
    tag = "roles",
    operation_id = "getAdminRolesByIdPermissions",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role permissions", body = PermissionListResponse),
        (status = 404, description = "Role not found")
    )
)]
pub async fn role_permissions(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<PermissionListResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_ROLES).await?;

    let role = state
        .role_repo
        .find_with_permissions(id)
        .await?
        .ok_or_else(|| PortalError::not_found("Role", id))?;

    Ok(Json(PermissionListResponse {
        permissions: role.permissions,
    }))
}

/// List all permissions
#[utoipa::path(
    get,
    path = "/permissions",
    tag = "roles",
    operation_id = "getAdminPermissions",
    responses(
        (status = 200, description = "List of permissions", body = PermissionListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing manage_roles")
    )
)]
pub async fn list_permissions(
    State(state): State<RolesState>,
    auth: Authenticated,
) -> Result<Json<PermissionListResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_ROLES).await?;

    let permissions = state.permission_repo.find_all().await?;
    Ok(Json(PermissionListResponse { permissions }))
}

/// Grant a permission to a role
///
/// Granting an already-held permission is a no-op.
#[utoipa::path(
    post,
    path = "/roles/{role_id}/permissions/{permission_id}",
    tag = "roles",
    operation_id = "postAdminRolePermission",
    params(
        ("role_id" = i64, Path, description = "Role id"),
        ("permission_id" = i64, Path, description = "Permission id")
    ),
    responses(
        (status = 200, description = "Permission granted", body = SuccessResponse)
    )
)]
pub async fn grant_permission(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path((role_id, permission_id)): Path<(i64, i64)>,
) -> Result<Json<SuccessResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_ROLES).await?;

    state.role_repo.grant_permission(role_id, permission_id).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Revoke a permission from a role
///
/// Revoking an unheld permission is a no-op.
#[utoipa::path(
    delete,
    path = "/roles/{role_id}/permissions/{permission_id}",
    tag = "roles",
    operation_id = "deleteAdminRolePermission",
    params(
        ("role_id" = i64, Path, description = "Role id"),
        ("permission_id" = i64, Path, description = "Permission id")
    ),
    responses(
        (status = 200, description = "Permission revoked", body = SuccessResponse)
    )
)]
pub async fn revoke_permission(
    State(state): State<RolesState>,
    auth: Authenticated,
    Path((role_id, permission_id)): Path<(i64, i64)>,
) -> Result<Json<SuccessResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::MANAGE_ROLES).await?;

    state.role_repo.revoke_permission(role_id, permission_id).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Create the roles router (mounted under /api/admin)
pub fn roles_router(state: RolesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_roles, create_role))
        .routes(routes!(update_role, delete_role))
        .routes(routes!(role_permissions))
        .routes(routes!(list_permissions))
        .routes(routes!(grant_permission, revoke_permission))
        .with_state(state)
}
