//! Order handlers

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};

use super::super::state::AppState;
use super::super::types::{ApiResult, created, ok};
use super::helpers::{json_body, resolve_caller, resolve_farm};
use crate::order::{CreateOrderRequest, OrderWithInvoice, PlacedOrder};
use crate::user_auth::Claims;

/// Place an order
///
/// Creates one invoice and one order per product line in a single transaction.
/// `total_harga` in the response is the grand total including shipping.
#[utoipa::path(
    post,
    path = "/order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order and invoice created", body = PlacedOrder),
        (status = 400, description = "Invalid request, unknown product/shipping, or insufficient stock", body = crate::gateway::error::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::gateway::error::ErrorBody),
        (status = 500, description = "Database error", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Order"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<PlacedOrder> {
    let caller = resolve_caller(&state, &claims).await?;
    let request = json_body(payload)?;
    let command = request.into_command(caller.id, |user_id| state.next_invoice_number(user_id))?;

    let placed = state.orders.place_order(&command).await?;
    created("Order and Invoice created successfully", placed)
}

/// Orders for the caller's farm products
#[utoipa::path(
    get,
    path = "/order",
    responses(
        (status = 200, description = "Orders with their invoices", body = [OrderWithInvoice]),
        (status = 404, description = "Caller has no farm", body = crate::gateway::error::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Order"
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Vec<OrderWithInvoice>> {
    let caller = resolve_caller(&state, &claims).await?;
    let farm = resolve_farm(&state, caller.id).await?;

    let product_ids: Vec<i64> = state
        .catalog
        .list_farm_products(farm.id)
        .await?
        .iter()
        .map(|p| p.id)
        .collect();
    let orders = state.orders.orders_for_products(&product_ids).await?;
    ok("Orders retrieved successfully", orders)
}
