//! Vitrine Back Office
//!
//! Backend for the Vitrine marketing site:
//! - Session-based authentication against salted scrypt credentials
//! - Role-based access control with a carte-blanche bypass sentinel
//! - Admin APIs for users, roles, permissions, and submitted inquiries
//! - Public contact-form intake
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Data access
//! - `api` - REST endpoints

// Core aggregates
pub mod contact;
pub mod role;
pub mod user;

// Authentication & authorization
pub mod auth;

// Shared infrastructure
pub mod shared;
pub mod store;

// Seeding
pub mod seed;

// Re-export common types from shared
pub use shared::error::{PortalError, Result};

// Re-export main entity types for convenience
pub use contact::entity::Contact;
pub use role::entity::{permissions, Permission, Role, RoleWithPermissions};
pub use user::entity::{User, UserWithRole};

// Re-export repositories
pub use contact::repository::ContactRepository;
pub use role::repository::{PermissionRepository, RoleRepository};
pub use user::repository::UserRepository;

// Re-export services
pub use auth::password_service::{PasswordService, ScryptConfig};
pub use auth::session_service::SessionStore;
pub use shared::authorization_service::{AuthContext, AuthorizationService};

// Re-export API surface
pub use auth::auth_api::{auth_router, AuthState};
pub use contact::api::{contacts_router, ContactsState};
pub use role::api::{roles_router, RolesState};
pub use shared::middleware::{AppState, AuthLayer, Authenticated};
pub use user::api::{users_router, UsersState};
