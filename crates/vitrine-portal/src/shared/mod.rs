//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod api_common;
pub mod authorization_service;
pub mod error;
pub mod middleware;

// Re-export commonly used items
pub use authorization_service::{AuthContext, AuthorizationService};
pub use error::{PortalError, Result};
pub use middleware::{AppState, AuthLayer, Authenticated};
