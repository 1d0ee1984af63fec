//! Account management module
//!
//! PostgreSQL-backed storage for platform accounts (`akun`). Accounts are looked
//! up by id for profile endpoints and by phone number for token subjects.

pub mod models;
pub mod repository;

pub use models::{Account, AccountUpdate, AccountView};
pub use repository::{AccountStore, PgAccountStore};
