//! Role Aggregate
//!
//! Roles, permissions, and the role<->permission assignment.

pub mod api;
pub mod entity;
pub mod repository;

pub use api::{roles_router, RolesState};
pub use entity::{permissions, Permission, Role, RoleWithPermissions};
pub use repository::{PermissionRepository, RoleRepository};
