//! CORS for every route.
//!
//! `CorsLayer` mirrors the request origin and answers every `OPTIONS` itself.
//! [`preflight_and_wildcard`] wraps it for the two behaviours clients rely on
//! that the layer lacks: preflight answers are `204`, and requests without an
//! `Origin` get `Access-Control-Allow-Origin: *`.

use axum::{
    body::Body,
    http::{
        HeaderName, HeaderValue, Method, Request, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION,
            CONTENT_TYPE, ORIGIN,
        },
    },
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const ALLOWED_METHODS: [Method; 5] = [
    Method::POST,
    Method::GET,
    Method::OPTIONS,
    Method::PUT,
    Method::DELETE,
];

/// Legacy token header still sent by older clients
pub const LOGIN_HEADER: &str = "login";

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(LOGIN_HEADER),
        ])
}

/// Must sit outside [`cors_layer`].
pub async fn preflight_and_wildcard(request: Request<Body>, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS;
    let has_origin = request.headers().contains_key(ORIGIN);

    let mut response = next.run(request).await;

    if preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    if !has_origin {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        // Credentials are never allowed together with a wildcard origin
        headers.remove(ACCESS_CONTROL_ALLOW_CREDENTIALS);
    }
    response
}
