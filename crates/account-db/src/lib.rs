//! Account Database Layer
//!
//! This crate owns the persisted user record and the narrow store contract
//! the account service talks to, backed by SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
pub use store::UserStore;
