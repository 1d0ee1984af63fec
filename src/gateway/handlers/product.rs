//! Farm product handlers
//!
//! Writes follow one order: authenticate, resolve the caller's farm, parse and
//! validate every field and the image, then upload, then write. A failed write
//! removes the upload again.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension,
    extract::{Multipart, Query, State},
    http::HeaderMap,
};

use super::super::error::ApiError;
use super::super::state::AppState;
use super::super::types::{ApiResult, created, done, ok};
use super::helpers::{
    discard_upload, query_id, required_id, resolve_caller, resolve_farm, upload_image,
};
use super::multipart::read_form;
use crate::catalog::{ProductFields, ProductView};
use crate::user_auth::{Claims, authenticate};

/// List products
///
/// Without `id`: every product (public). With `id`: the caller's own product,
/// which requires a bearer token.
#[utoipa::path(
    get,
    path = "/product",
    params(("id" = Option<i64>, Query, description = "Product id within the caller's farm")),
    responses(
        (status = 200, description = "Products", body = [ProductView]),
        (status = 401, description = "Token required for id lookup", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "No products", body = crate::gateway::error::ErrorBody)
    ),
    tag = "Product"
)]
pub async fn get_products(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<ProductView>> {
    if let Some(product_id) = query_id(&params, "id")? {
        let claims = authenticate(&state, &headers)?;
        let caller = resolve_caller(&state, &claims).await?;
        let farm = resolve_farm(&state, caller.id).await?;
        let product = state
            .catalog
            .product_in_farm(product_id, farm.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product not found"))?;
        return ok("Product retrieved successfully", vec![product.into()]);
    }

    let products = state.catalog.list_products().await?;
    if products.is_empty() {
        return ApiError::not_found("No products found").into_err();
    }
    ok(
        "Products retrieved successfully",
        products.into_iter().map(ProductView::from).collect(),
    )
}

/// List the caller's farm products
#[utoipa::path(
    get,
    path = "/product/farm",
    responses(
        (status = 200, description = "Products of the caller's farm", body = [ProductView]),
        (status = 404, description = "Caller has no farm", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Product"
)]
pub async fn list_farm_products(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Vec<ProductView>> {
    let caller = resolve_caller(&state, &claims).await?;
    let farm = resolve_farm(&state, caller.id).await?;
    let products = state.catalog.list_farm_products(farm.id).await?;
    ok(
        "Products retrieved successfully",
        products.into_iter().map(ProductView::from).collect(),
    )
}

/// Create a product (multipart form)
///
/// Fields: `product_name`, `description`, `price_per_kg`, `weight_per_kg`,
/// `stock_kg`, `status_name`, `available_date` (`dd/Month/yy`), file `image`.
#[utoipa::path(
    post,
    path = "/add/product",
    request_body(content_type = "multipart/form-data", description = "Product fields and image"),
    responses(
        (status = 201, description = "Product created", body = ProductView),
        (status = 400, description = "Invalid field or image", body = crate::gateway::error::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "Caller has no farm", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Product"
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> ApiResult<ProductView> {
    let caller = resolve_caller(&state, &claims).await?;
    let farm = resolve_farm(&state, caller.id).await?;

    let form = read_form(multipart).await?;
    let fields = ProductFields::from_form(&form)?;
    let image = form.required_image()?;

    let upload = upload_image(&state, image, &state.image_dirs.products).await?;
    match state.catalog.create_product(farm.id, &fields, &upload.url).await {
        Ok(product) => created("Product created successfully", product.into()),
        Err(e) => {
            discard_upload(&state, &upload).await;
            Err(e.into())
        }
    }
}

/// Update a product of the caller's farm (multipart form, image optional)
#[utoipa::path(
    put,
    path = "/product/update",
    params(("id" = i64, Query, description = "Product id")),
    request_body(content_type = "multipart/form-data", description = "Product fields, optional image"),
    responses(
        (status = 200, description = "Product updated", body = ProductView),
        (status = 400, description = "Invalid field or image", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "Product not in the caller's farm", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Product"
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<HashMap<String, String>>,
    multipart: Multipart,
) -> ApiResult<ProductView> {
    let product_id = required_id(&params, "id")?;
    let caller = resolve_caller(&state, &claims).await?;
    let farm = resolve_farm(&state, caller.id).await?;

    if state
        .catalog
        .product_in_farm(product_id, farm.id)
        .await?
        .is_none()
    {
        return ApiError::not_found("Product not found").into_err();
    }

    let form = read_form(multipart).await?;
    let fields = ProductFields::from_form(&form)?;
    let image = form.image()?;

    let upload = match image {
        Some(image) => Some(upload_image(&state, image, &state.image_dirs.products).await?),
        None => None,
    };
    let image_url = upload.as_ref().map(|u| u.url.as_str());

    let result = state
        .catalog
        .update_product(product_id, farm.id, &fields, image_url)
        .await;
    match result {
        Ok(Some(product)) => {
            tracing::info!(product_id, farm_id = farm.id, "Product updated");
            ok("Product updated successfully", product.into())
        }
        other => {
            if let Some(upload) = &upload {
                discard_upload(&state, upload).await;
            }
            match other {
                Err(e) => Err(e.into()),
                _ => ApiError::not_found("Product not found").into_err(),
            }
        }
    }
}

/// Delete a product of the caller's farm
#[utoipa::path(
    delete,
    path = "/product/delete",
    params(("id" = i64, Query, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 400, description = "Product still has orders", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "Product not in the caller's farm", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Product"
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<()> {
    let product_id = required_id(&params, "id")?;
    let caller = resolve_caller(&state, &claims).await?;
    let farm = resolve_farm(&state, caller.id).await?;

    if !state.catalog.delete_product(product_id, farm.id).await? {
        return ApiError::not_found("Product not found").into_err();
    }
    tracing::info!(product_id, farm_id = farm.id, "Product deleted");
    done("Product deleted successfully")
}
