pub mod cors;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;


use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::user_auth::jwt_auth_middleware;
use error::ApiError;
use handlers::{account, farm, health, order, product, radius};
use state::AppState;

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Build the full application router.
///
/// Layer order, outermost first: CORS wrapper, CORS layer, body limit, then
/// per-route bearer authentication on the protected group.
pub fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/profile/all", get(account::list_accounts))
        .route("/profile/by-id", get(account::get_account))
        .route("/profile/update", put(account::update_account))
        // `?id=` switches to the authenticated, farm-scoped lookup
        .route("/product", get(product::get_products))
        .route("/radius", get(radius::search_radius));

    let protected_routes = Router::new()
        .route("/add/product", post(product::create_product))
        .route("/product/farm", get(product::list_farm_products))
        .route("/product/update", put(product::update_product))
        .route("/product/delete", delete(product::delete_product))
        .route("/peternakan", post(farm::create_farm))
        .route("/peternakan/get", get(farm::get_my_farm))
        .route("/peternakan/by-id", get(farm::get_farm_by_id))
        .route("/peternakan/update", put(farm::update_farm))
        .route("/peternakan/delete", delete(farm::delete_farm))
        .route("/order", post(order::create_order).get(order::list_orders))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(route_not_found)
        .with_state(state)
        // Stateless, added after with_state
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors::cors_layer())
        .layer(from_fn(cors::preflight_and_wildcard))
}

/// Bind and serve until the process is stopped.
pub async fn run_server(
    host: &str,
    port: u16,
    state: Arc<AppState>,
    max_body_bytes: usize,
) -> std::io::Result<()> {
    let app = router(state, max_body_bytes);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        tracing::error!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            port
        );
    })?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app).await
}
