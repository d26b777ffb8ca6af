//! User Repository

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::role::entity::Role;
use crate::shared::error::Result;
use crate::user::entity::{User, UserWithRole};

const USER_COLUMNS: &str = "id, username, password, role_id";

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role_id: Option<i64>,
    ) -> Result<User> {
        let id = Uuid::new_v4().to_string();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, username, password, role_id) VALUES (?, ?, ?, ?)
             RETURNING {USER_COLUMNS}",
        ))
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .bind(role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Exact username lookup used by login.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    pub async fn find_with_role(&self, id: &str) -> Result<Option<UserWithRole>> {
        let row = sqlx::query(
            "SELECT u.id, u.username, u.role_id,
                    r.id AS r_id, r.name AS r_name, r.description AS r_description
             FROM users u
             LEFT JOIN roles r ON r.id = u.role_id
             WHERE u.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| user_with_role_from_row(&r)).transpose()
    }

    pub async fn find_all_with_roles(&self) -> Result<Vec<UserWithRole>> {
        let rows = sqlx::query(
            "SELECT u.id, u.username, u.role_id,
                    r.id AS r_id, r.name AS r_name, r.description AS r_description
             FROM users u
             LEFT JOIN roles r ON r.id = u.role_id
             ORDER BY u.username",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_with_role_from_row).collect()
    }

    /// Assign or clear a user's role. Returns None when the user does not
    /// exist.
    pub async fn set_role(&self, id: &str, role_id: Option<i64>) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role_id = ? WHERE id = ? RETURNING {USER_COLUMNS}",
        ))
        .bind(role_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

fn user_with_role_from_row(row: &SqliteRow) -> Result<UserWithRole> {
    let role = match row.try_get::<Option<i64>, _>("r_id")? {
        Some(id) => Some(Role {
            id,
            name: row.try_get("r_name")?,
            description: row.try_get("r_description")?,
        }),
        None => None,
    };

    Ok(UserWithRole {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        role_id: row.try_get("role_id")?,
        role,
    })
}
