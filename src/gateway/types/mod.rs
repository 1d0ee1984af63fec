//! Gateway response types

pub mod response;

pub use response::{ApiResponse, ApiResult, created, done, ok};
