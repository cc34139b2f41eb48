//! Account Service
//!
//! Credential verification, signup and token payload handling on top of the
//! `account-db` user store. Hosts construct an [`AccountService`] with a store
//! and consume it through the [`UserService`] contract.

pub mod error;
pub mod password;
pub mod payload;
pub mod service;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use payload::{CreateUser, TokenPayload};
pub use service::{AccountService, UserService};
