use async_trait::async_trait;
use sqlx::PgPool;

use super::UserDirectory;
use crate::models::user::{UserProfile, UserRole, UserRow};
use crate::utils::errors::AppResult;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserRepository {
    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id, role, first_name, last_name, email, phone,
                street, city, postal_code, country,
                license_number, business_name, status, created_at
            FROM users
            WHERE role = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }
}
