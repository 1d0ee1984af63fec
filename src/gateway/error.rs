//! Gateway error type and its JSON rendering

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::catalog::{FormError, ImageError};
use crate::db::StoreError;
use crate::order::OrderValidationError;
use crate::proximity::RadiusError;
use crate::storage::UploadError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The message is shown to the client; put details in the log instead.
    #[error("{0}")]
    Internal(String),
}

/// Error body: `{"status":"error","error":"Not Found","message":"..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "error")]
    pub status: &'static str,
    #[schema(example = "Bad Request")]
    pub error: &'static str,
    #[schema(example = "Field 'product_name' is required")]
    pub message: String,
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "Unauthorized",
            Self::BadRequest(_) => "Bad Request",
            Self::NotFound(_) => "Not Found",
            Self::Internal(_) => "Internal Server Error",
        }
    }

    pub fn into_err<T>(self) -> Result<T, ApiError> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            status: "error",
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ApiError::internal("Database error")
            }
            StoreError::UnknownProduct(id) => {
                ApiError::bad_request(format!("Product {} not found", id))
            }
            StoreError::UnknownShipping(id) => {
                ApiError::bad_request(format!("Shipping method {} not found", id))
            }
            StoreError::InsufficientStock(id) => {
                ApiError::bad_request(format!("Insufficient stock for product {}", id))
            }
            StoreError::FarmAlreadyExists => {
                ApiError::bad_request("This account already has a farm")
            }
            StoreError::Duplicate(what) => {
                ApiError::bad_request(format!("The {} is already in use", what))
            }
            StoreError::InUse(what) => ApiError::bad_request(format!(
                "The {} is still referenced and cannot be deleted",
                what
            )),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        tracing::error!("Image upload failed: {}", err);
        ApiError::internal("Failed to upload image")
    }
}

macro_rules! bad_request_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    ApiError::BadRequest(err.to_string())
                }
            }
        )*
    };
}

bad_request_from!(ImageError, FormError, RadiusError, OrderValidationError);
