//! Bearer-token authentication for the gateway.

pub mod middleware;
pub mod service;

pub use middleware::{authenticate, jwt_auth_middleware};
pub use service::{Claims, TokenService, extract_token};
