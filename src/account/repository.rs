//! Repository layer for account operations

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{Account, AccountUpdate};
use crate::db::StoreError;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// Token subjects are phone numbers.
    async fn get_by_phone(&self, phone: &str) -> Result<Option<Account>, StoreError>;

    /// Returns false when no account has this id.
    async fn update(&self, id: i64, update: &AccountUpdate) -> Result<bool, StoreError>;
}

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = "id_user, nama, no_telp, email, id_role, password";

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM akun ORDER BY id_user"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM akun WHERE id_user = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_by_phone(&self, phone: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM akun WHERE no_telp = $1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, update: &AccountUpdate) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"UPDATE akun SET nama = $1, no_telp = $2, email = $3, id_role = $4
               WHERE id_user = $5"#,
        )
        .bind(&update.name)
        .bind(&update.phone)
        .bind(&update.email)
        .bind(update.role_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_constraint(e, "phone", "account"))?;

        Ok(result.rows_affected() > 0)
    }
}
