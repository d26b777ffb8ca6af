//! User Aggregate
//!
//! Back-office user accounts and role assignment.

pub mod api;
pub mod entity;
pub mod repository;

pub use api::{users_router, UsersState};
pub use entity::{User, UserWithRole};
pub use repository::UserRepository;
