//! farm_market - order & catalog backend for a farm-to-market platform
//!
//! # Modules
//!
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool, migrations and the shared store error
//! - [`account`] - accounts (`akun`)
//! - [`catalog`] - farms, products, images and form parsing
//! - [`order`] - order placement and invoices
//! - [`proximity`] - radius search over farm locations
//! - [`storage`] - external image store (GitHub contents API)
//! - [`user_auth`] - bearer-token verification
//! - [`gateway`] - HTTP router, handlers and OpenAPI document

pub mod config;
pub mod logging;

pub mod db;

// Domain
pub mod account;
pub mod catalog;
pub mod order;
pub mod proximity;
pub mod storage;

// HTTP
pub mod gateway;
pub mod user_auth;

#[cfg(test)]
pub(crate) mod testing;

pub use config::AppConfig;
pub use db::{Database, StoreError};
pub use gateway::{router, run_server, state::AppState};
