//! HTTP handlers, one module per resource

pub mod account;
pub mod farm;
pub mod health;
pub mod helpers;
pub mod multipart;
pub mod order;
pub mod product;
pub mod radius;

pub use health::HealthResponse;
