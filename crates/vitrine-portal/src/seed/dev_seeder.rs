//! Development Data Seeder
//!
//! Seeds the permission table, the admin role, and the default admin
//! account on startup. Safe to run repeatedly.
//!
//! Default credentials: admin / admin

use sqlx::SqlitePool;
use tracing::info;

use crate::auth::password_service::PasswordService;
use crate::role::entity::permissions;
use crate::role::repository::{PermissionRepository, RoleRepository};
use crate::shared::error::Result;
use crate::user::repository::UserRepository;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin";

/// Development data seeder
pub struct DevDataSeeder {
    role_repo: RoleRepository,
    permission_repo: PermissionRepository,
    user_repo: UserRepository,
    password_service: PasswordService,
}

impl DevDataSeeder {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            role_repo: RoleRepository::new(pool.clone()),
            permission_repo: PermissionRepository::new(pool.clone()),
            user_repo: UserRepository::new(pool),
            password_service: PasswordService::default(),
        }
    }

    /// Seed all development data
    pub async fn seed(&self) -> Result<()> {
        info!("Seeding development data...");

        self.seed_permissions().await?;
        let admin_role_id = self.seed_admin_role().await?;
        self.seed_admin_user(admin_role_id).await?;

        info!("Development data seeded");
        info!("Default login: {} / {}", ADMIN_USERNAME, ADMIN_PASSWORD);

        Ok(())
    }

    async fn seed_permissions(&self) -> Result<()> {
        for (name, description) in permissions::ALL {
            if self.permission_repo.find_by_name(name).await?.is_none() {
                self.permission_repo.insert(name, Some(description)).await?;
                info!(permission = %name, "Created permission");
            }
        }
        Ok(())
    }

    /// Ensure the admin role exists and holds every seeded permission,
    /// including carte_blanche.
    async fn seed_admin_role(&self) -> Result<i64> {
        let role = match self.role_repo.find_by_name("admin").await? {
            Some(role) => role,
            None => {
                let role = self
                    .role_repo
                    .insert("admin", Some("Administrator with full access"))
                    .await?;
                info!(id = role.id, "Created admin role");
                role
            }
        };

        for (name, _) in permissions::ALL {
            if let Some(permission) = self.permission_repo.find_by_name(name).await? {
                self.role_repo.grant_permission(role.id, permission.id).await?;
            }
        }

        Ok(role.id)
    }

    async fn seed_admin_user(&self, role_id: i64) -> Result<()> {
        if self.user_repo.find_by_username(ADMIN_USERNAME).await?.is_some() {
            return Ok(());
        }

        let password_hash = self.password_service.hash_password(ADMIN_PASSWORD)?;
        self.user_repo
            .insert(ADMIN_USERNAME, &password_hash, Some(role_id))
            .await?;
        info!(username = %ADMIN_USERNAME, "Created admin user");

        Ok(())
    }
}
