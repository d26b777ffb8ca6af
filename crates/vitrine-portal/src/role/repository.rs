//! Role and Permission Repositories

use sqlx::SqlitePool;

use crate::role::entity::{Permission, Role, RoleWithPermissions};
use crate::shared::error::Result;

pub struct RoleRepository {
    pool: SqlitePool,
}

impl RoleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, name: &str, description: Option<&str>) -> Result<Role> {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES (?, ?) RETURNING id, name, description",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(role)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    pub async fn find_all(&self) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    /// Load a role joined with its current permission set.
    pub async fn find_with_permissions(&self, id: i64) -> Result<Option<RoleWithPermissions>> {
        let Some(role) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT p.id, p.name, p.description
             FROM role_permissions rp
             INNER JOIN permissions p ON p.id = rp.permission_id
             WHERE rp.role_id = ?
             ORDER BY p.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(RoleWithPermissions { role, permissions }))
    }

    /// Update name/description. Returns None when the role does not exist.
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(
            "UPDATE roles
             SET name = COALESCE(?, name), description = COALESCE(?, description)
             WHERE id = ?
             RETURNING id, name, description",
        )
        .bind(name)
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    /// Delete a role together with its association rows.
    ///
    /// The whole cascade runs in one transaction: users referencing the role
    /// are detached, association rows are removed, then the role itself. A
    /// concurrent permission check never observes a half-deleted role.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET role_id = NULL WHERE role_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Grant a permission to a role. Granting an already-held permission is a
    /// no-op.
    pub async fn grant_permission(&self, role_id: i64, permission_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) VALUES (?, ?)
             ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Revoke a permission from a role. Revoking an unheld permission is a
    /// no-op.
    pub async fn revoke_permission(&self, role_id: i64, permission_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = ? AND permission_id = ?")
            .bind(role_id)
            .bind(permission_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

pub struct PermissionRepository {
    pool: SqlitePool,
}

impl PermissionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, name: &str, description: Option<&str>) -> Result<Permission> {
        let permission = sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (name, description) VALUES (?, ?)
             RETURNING id, name, description",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(permission)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Permission>> {
        let permission =
            sqlx::query_as::<_, Permission>("SELECT id, name, description FROM permissions WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(permission)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Permission>> {
        let permission =
            sqlx::query_as::<_, Permission>("SELECT id, name, description FROM permissions WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(permission)
    }

    pub async fn find_all(&self) -> Result<Vec<Permission>> {
        let permissions =
            sqlx::query_as::<_, Permission>("SELECT id, name, description FROM permissions ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(permissions)
    }
}
