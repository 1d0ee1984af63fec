//! Success envelope
//!
//! Every successful response is `{"status":"success","message":...,"data":...}`;
//! `data` is omitted for message-only replies.

use axum::{Json, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::gateway::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = "success")]
    pub status: &'static str,
    #[schema(example = "Product created successfully")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: None,
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 with data.
pub fn ok<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(message, data))))
}

/// 201 with data.
pub fn created<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(message, data))))
}

/// 200 without data.
pub fn done(message: impl Into<String>) -> ApiResult<()> {
    Ok((StatusCode::OK, Json(ApiResponse::message(message))))
}
