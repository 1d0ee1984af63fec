//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::{AccountUpdate, AccountView};
use crate::catalog::{Address, Farm, GeoPoint, ProductView};
use crate::gateway::error::ErrorBody;
use crate::gateway::handlers::HealthResponse;
use crate::order::{CreateOrderRequest, OrderLineRequest, OrderWithInvoice, PlacedLine, PlacedOrder};
use crate::proximity::{FeatureProperties, LocationFeature, NearbyFarm, PointGeometry};

/// HS256 bearer tokens whose subject is the account's phone number
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Authorization: Bearer <jwt>. The legacy `login: <jwt>` header is also accepted.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Farm Market API",
        version = "0.1.0",
        description = "Accounts, farm/product catalog, orders with invoices, and radius search for a farm-to-market platform.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::account::list_accounts,
        crate::gateway::handlers::account::get_account,
        crate::gateway::handlers::account::update_account,
        crate::gateway::handlers::product::get_products,
        crate::gateway::handlers::product::list_farm_products,
        crate::gateway::handlers::product::create_product,
        crate::gateway::handlers::product::update_product,
        crate::gateway::handlers::product::delete_product,
        crate::gateway::handlers::farm::create_farm,
        crate::gateway::handlers::farm::get_my_farm,
        crate::gateway::handlers::farm::get_farm_by_id,
        crate::gateway::handlers::farm::update_farm,
        crate::gateway::handlers::farm::delete_farm,
        crate::gateway::handlers::order::create_order,
        crate::gateway::handlers::order::list_orders,
        crate::gateway::handlers::radius::search_radius,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            AccountView,
            AccountUpdate,
            Address,
            GeoPoint,
            Farm,
            ProductView,
            CreateOrderRequest,
            OrderLineRequest,
            PlacedOrder,
            PlacedLine,
            OrderWithInvoice,
            NearbyFarm,
            LocationFeature,
            PointGeometry,
            FeatureProperties,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Account", description = "Account listing and editing"),
        (name = "Farm", description = "The caller's farm (auth required)"),
        (name = "Product", description = "Farm products and their images"),
        (name = "Order", description = "Orders and invoices (auth required)"),
        (name = "Search", description = "Radius search over farm locations"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Farm Market API");
        assert!(spec.to_json().is_ok());
    }

    #[test]
    fn test_endpoints_registered() {
        let paths = ApiDoc::openapi().paths.paths;
        for path in [
            "/health",
            "/profile/all",
            "/add/product",
            "/product",
            "/peternakan",
            "/order",
            "/radius",
        ] {
            assert!(paths.contains_key(path), "{path} missing from document");
        }
    }

    #[test]
    fn test_security_scheme_registered() {
        let components = ApiDoc::openapi()
            .components
            .expect("should have components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
