use thiserror::Error;

/// Failure reported by any store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unknown product: {0}")]
    UnknownProduct(i64),

    #[error("Unknown shipping method: {0}")]
    UnknownShipping(i64),

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(i64),

    #[error("Owner already has a farm")]
    FarmAlreadyExists,

    #[error("Duplicate value for {0}")]
    Duplicate(&'static str),

    #[error("{0} is still referenced")]
    InUse(&'static str),
}

impl StoreError {
    /// Classify constraint violations by SQLSTATE; everything else stays a
    /// plain database error.
    pub fn from_constraint(err: sqlx::Error, unique: &'static str, foreign: &'static str) -> Self {
        let code = err
            .as_database_error()
            .and_then(|d| d.code())
            .map(|c| c.into_owned());
        match code.as_deref() {
            Some("23505") => StoreError::Duplicate(unique),
            Some("23503") => StoreError::InUse(foreign),
            _ => StoreError::Database(err),
        }
    }
}
