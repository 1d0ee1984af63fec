//! Data models for account management

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Account row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    #[sqlx(rename = "id_user")]
    pub id: i64,
    #[sqlx(rename = "nama")]
    pub name: String,
    #[sqlx(rename = "no_telp")]
    pub phone: String,
    pub email: String,
    #[sqlx(rename = "id_role")]
    pub role_id: i64,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// Public shape of an account. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountView {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Siti Aminah")]
    pub name: String,
    #[schema(example = "6281234567890")]
    pub phone: String,
    #[schema(example = "siti@example.com")]
    pub email: String,
    #[schema(example = 2)]
    pub role_id: i64,
}

impl From<Account> for AccountView {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            name: a.name,
            phone: a.phone,
            email: a.email,
            role_id: a.role_id,
        }
    }
}

/// Edit-account payload; accepts the legacy Indonesian field names too.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct AccountUpdate {
    #[serde(alias = "nama")]
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    #[serde(alias = "no_telp")]
    #[validate(custom(function = "not_blank", message = "phone is required"))]
    pub phone: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(alias = "id_role")]
    #[validate(range(min = 1, message = "role_id is required"))]
    pub role_id: i64,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
