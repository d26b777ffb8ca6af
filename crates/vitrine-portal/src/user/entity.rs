//! User Entity
//!
//! Back-office user accounts. A user references at most one role; the
//! reference is detached when the role is deleted.

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::role::entity::Role;

/// User account
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier (UUID v4)
    pub id: String,

    /// Login name, unique within the store
    pub username: String,

    /// Credential hash in `hash.salt` hex form. Never serialized.
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,

    /// Optional role reference
    pub role_id: Option<i64>,
}

/// User joined with its optional role
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithRole {
    pub id: String,
    pub username: String,
    pub role_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: "u-1".to_string(),
            username: "alice".to_string(),
            password_hash: "deadbeef.cafe".to_string(),
            role_id: None,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("password"));
        assert!(json.contains("alice"));
    }
}
