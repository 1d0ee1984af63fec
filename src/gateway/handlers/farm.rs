//! Farm handlers (`/peternakan`)

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension,
    extract::{Multipart, Query, State},
};

use super::super::error::ApiError;
use super::super::state::AppState;
use super::super::types::{ApiResult, created, done, ok};
use super::helpers::{discard_upload, required_id, resolve_caller, resolve_farm, upload_image};
use super::multipart::read_form;
use crate::catalog::{Farm, FarmFields};
use crate::user_auth::Claims;

/// Create the caller's farm (multipart form)
///
/// Fields: `name`, `farm_type`, `phone`, `email`, `description`, `lat`, `lon`,
/// `street`, `city`, `province`, `postal_code`, `country`, file `image`.
#[utoipa::path(
    post,
    path = "/peternakan",
    request_body(content_type = "multipart/form-data", description = "Farm fields and image"),
    responses(
        (status = 201, description = "Farm created", body = Farm),
        (status = 400, description = "Invalid field, image, or the caller already has a farm", body = crate::gateway::error::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Farm"
)]
pub async fn create_farm(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> ApiResult<Farm> {
    let caller = resolve_caller(&state, &claims).await?;
    if state.catalog.farm_for_owner(caller.id).await?.is_some() {
        return ApiError::bad_request("This account already has a farm").into_err();
    }

    let form = read_form(multipart).await?;
    let fields = FarmFields::from_form(&form)?;
    let image = form.required_image()?;

    let upload = upload_image(&state, image, &state.image_dirs.farms).await?;
    match state.catalog.create_farm(caller.id, &fields, &upload.url).await {
        Ok(farm) => created("Farm created successfully", farm.into()),
        Err(e) => {
            discard_upload(&state, &upload).await;
            Err(e.into())
        }
    }
}

/// The caller's farm
#[utoipa::path(
    get,
    path = "/peternakan/get",
    responses(
        (status = 200, description = "Farm", body = Farm),
        (status = 404, description = "Caller has no farm", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Farm"
)]
pub async fn get_my_farm(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Farm> {
    let caller = resolve_caller(&state, &claims).await?;
    let farm = resolve_farm(&state, caller.id).await?;
    ok("Farm data retrieved successfully", farm.into())
}

/// Any farm by id
#[utoipa::path(
    get,
    path = "/peternakan/by-id",
    params(("farm_id" = i64, Query, description = "Farm id")),
    responses(
        (status = 200, description = "Farm", body = Farm),
        (status = 400, description = "Missing farm_id", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "No such farm", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Farm"
)]
pub async fn get_farm_by_id(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Farm> {
    let farm_id = required_id(&params, "farm_id")?;
    resolve_caller(&state, &claims).await?;
    match state.catalog.farm_by_id(farm_id).await? {
        Some(farm) => ok("Farm data retrieved successfully", farm.into()),
        None => ApiError::not_found(format!("Farm {} not found", farm_id)).into_err(),
    }
}

/// Update the caller's farm (multipart form, image optional)
#[utoipa::path(
    put,
    path = "/peternakan/update",
    request_body(content_type = "multipart/form-data", description = "Farm fields, optional image"),
    responses(
        (status = 200, description = "Farm updated", body = Farm),
        (status = 400, description = "Invalid field or image", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "Caller has no farm", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Farm"
)]
pub async fn update_farm(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> ApiResult<Farm> {
    let caller = resolve_caller(&state, &claims).await?;
    let farm = resolve_farm(&state, caller.id).await?;

    let form = read_form(multipart).await?;
    let fields = FarmFields::from_form(&form)?;
    let image = form.image()?;

    let upload = match image {
        Some(image) => Some(upload_image(&state, image, &state.image_dirs.farms).await?),
        None => None,
    };
    let image_url = upload.as_ref().map(|u| u.url.as_str());

    match state.catalog.update_farm(farm.id, &fields, image_url).await {
        Ok(Some(updated)) => {
            tracing::info!(farm_id = farm.id, "Farm updated");
            ok("Farm updated successfully", updated.into())
        }
        other => {
            if let Some(upload) = &upload {
                discard_upload(&state, upload).await;
            }
            match other {
                Err(e) => Err(e.into()),
                _ => ApiError::not_found("No farm found for this account").into_err(),
            }
        }
    }
}

/// Delete the caller's farm
#[utoipa::path(
    delete,
    path = "/peternakan/delete",
    responses(
        (status = 200, description = "Farm deleted"),
        (status = 400, description = "Farm still has products", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "Caller has no farm", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Farm"
)]
pub async fn delete_farm(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<()> {
    let caller = resolve_caller(&state, &claims).await?;
    let farm = resolve_farm(&state, caller.id).await?;

    if !state.catalog.delete_farm(farm.id).await? {
        return ApiError::not_found("No farm found for this account").into_err();
    }
    tracing::info!(farm_id = farm.id, owner_id = caller.id, "Farm deleted");
    done("Farm deleted successfully")
}
