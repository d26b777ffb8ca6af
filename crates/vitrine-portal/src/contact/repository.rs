//! Contact Repository

use chrono::Utc;
use sqlx::SqlitePool;

use crate::contact::entity::Contact;
use crate::shared::error::Result;

pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        company: Option<&str>,
        message: &str,
    ) -> Result<Contact> {
        let contact = sqlx::query_as::<_, Contact>(
            "INSERT INTO contacts (name, email, company, message, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, name, email, company, message, created_at",
        )
        .bind(name)
        .bind(email)
        .bind(company)
        .bind(message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    /// All inquiries, newest first.
    pub async fn find_all(&self) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT id, name, email, company, message, created_at
             FROM contacts
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }
}
