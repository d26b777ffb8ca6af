//! Authentication Aggregate
//!
//! Credential verification and session management.

pub mod auth_api;
pub mod password_service;
pub mod session_service;

// Re-export main types
pub use auth_api::{auth_router, AuthState};
pub use password_service::{PasswordService, ScryptConfig};
pub use session_service::{Session, SessionStore};
