//! Handler helpers shared by the catalog, farm and order endpoints

use std::collections::HashMap;

use axum::{Json, extract::rejection::JsonRejection};

use crate::account::Account;
use crate::catalog::{FarmRow, UploadedImage};
use crate::gateway::{error::ApiError, state::AppState};
use crate::user_auth::Claims;

/// Map the token subject (a phone number) to its account.
pub async fn resolve_caller(state: &AppState, claims: &Claims) -> Result<Account, ApiError> {
    state
        .accounts
        .get_by_phone(&claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::debug!("No account for token subject {}", claims.sub);
            ApiError::unauthorized("No account found for this token. Please log in again.")
        })
}

pub async fn resolve_farm(state: &AppState, owner_id: i64) -> Result<FarmRow, ApiError> {
    state
        .catalog
        .farm_for_owner(owner_id)
        .await?
        .ok_or_else(|| ApiError::not_found("No farm found for this account"))
}

/// Optional numeric query parameter; present but malformed is an error.
pub fn query_id(params: &HashMap<String, String>, name: &str) -> Result<Option<i64>, ApiError> {
    match params.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid {} parameter", name))),
    }
}

pub fn required_id(params: &HashMap<String, String>, name: &str) -> Result<i64, ApiError> {
    query_id(params, name)?
        .ok_or_else(|| ApiError::bad_request(format!("Missing {} parameter", name)))
}

pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e.body_text())))
}

/// An image stored for the current request.
#[derive(Debug)]
pub struct Upload {
    pub path: String,
    pub url: String,
    /// This request put the object there; only then may it be discarded.
    pub created: bool,
}

/// Upload a validated image under `dir`.
pub async fn upload_image(
    state: &AppState,
    image: UploadedImage,
    dir: &str,
) -> Result<Upload, ApiError> {
    let path = image.object_path(dir);
    let stored = state.images.upload(&path, image.content).await?;
    Ok(Upload {
        path,
        url: stored.url,
        created: stored.created,
    })
}

/// Best-effort removal of an upload whose database write failed. Objects that
/// existed before this request are left alone: other rows may point at them.
pub async fn discard_upload(state: &AppState, upload: &Upload) {
    if !upload.created {
        tracing::debug!("Keeping pre-existing image {}", upload.path);
        return;
    }
    if let Err(e) = state.images.remove(&upload.path).await {
        tracing::warn!("Failed to remove orphaned upload {}: {}", upload.path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_id() {
        assert_eq!(query_id(&params(&[("id", "12")]), "id").unwrap(), Some(12));
        assert_eq!(query_id(&params(&[]), "id").unwrap(), None);
        assert_eq!(query_id(&params(&[("id", " ")]), "id").unwrap(), None);
        assert!(query_id(&params(&[("id", "abc")]), "id").is_err());
        assert!(query_id(&params(&[("id", "0")]), "id").is_err());
        assert!(required_id(&params(&[]), "farm_id").is_err());
    }
}
