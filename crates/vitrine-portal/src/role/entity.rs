//! Role and Permission Entities
//!
//! Authorization model for role-based access control. A role bundles a set
//! of named permissions; users reference at most one role.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Role definition
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i64,

    /// Role name. Uniqueness is an administrative convention enforced at the
    /// API boundary, not by the store.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Permission definition
///
/// The name is the stable identifier; protected routes check permissions by
/// name string only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: i64,

    /// Permission name (e.g. "view_forms", "manage_roles")
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A role joined with its current permission set
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

impl RoleWithPermissions {
    /// Exact, case-sensitive membership test. The carte-blanche bypass lives
    /// in the authorization service, not here.
    pub fn holds(&self, permission_name: &str) -> bool {
        self.permissions.iter().any(|p| p.name == permission_name)
    }
}

/// Well-known permission names
///
/// These are seeded at provisioning time; the authorization engine treats
/// them as opaque strings apart from the carte-blanche sentinel.
pub mod permissions {
    /// View submitted contact forms
    pub const VIEW_FORMS: &str = "view_forms";

    /// Manage system users and assign roles
    pub const MANAGE_USERS: &str = "manage_users";

    /// Manage roles and permissions
    pub const MANAGE_ROLES: &str = "manage_roles";

    /// View and modify system settings
    pub const VIEW_SETTINGS: &str = "view_settings";

    /// Sentinel: a role holding this passes every permission check
    pub const CARTE_BLANCHE: &str = "carte_blanche";

    /// All seeded permissions with their descriptions
    pub const ALL: &[(&str, &str)] = &[
        (VIEW_FORMS, "View submitted contact forms"),
        (MANAGE_USERS, "Manage system users and assign roles"),
        (MANAGE_ROLES, "Manage roles and permissions"),
        (VIEW_SETTINGS, "View and modify system settings"),
        (CARTE_BLANCHE, "Full access - bypasses all permission checks"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_with(names: &[&str]) -> RoleWithPermissions {
        RoleWithPermissions {
            role: Role {
                id: 1,
                name: "editor".to_string(),
                description: None,
            },
            permissions: names
                .iter()
                .enumerate()
                .map(|(i, n)| Permission {
                    id: i as i64 + 1,
                    name: (*n).to_string(),
                    description: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_holds_is_exact_match() {
        let role = role_with(&[permissions::VIEW_FORMS]);
        assert!(role.holds("view_forms"));
        assert!(!role.holds("View_Forms"));
        assert!(!role.holds("view"));
        assert!(!role.holds("view_forms_extra"));
    }

    #[test]
    fn test_role_with_permissions_flattens_role_fields() {
        let json = serde_json::to_value(role_with(&[])).unwrap();
        assert_eq!(json["name"], "editor");
        assert!(json["permissions"].as_array().unwrap().is_empty());
    }
}
