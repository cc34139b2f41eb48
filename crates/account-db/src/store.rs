//! Store contract consumed by the account service

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewUser, User, UserFilter};

/// Narrow user store contract: equality lookup, insert, login stamp.
///
/// [`crate::Database`] is the production implementation. Hosts with their
/// own persistence layer implement this trait instead.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a single user matching the filter
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, DbError>;

    /// Persist a new user and return it with its generated id and timestamps.
    ///
    /// Violating the username or mobile uniqueness constraint yields
    /// [`DbError::Duplicate`].
    async fn save(&self, user: NewUser) -> Result<User, DbError>;

    /// Set `last_login` to now and return the updated record.
    ///
    /// An unknown id yields [`DbError::NotFound`].
    async fn touch_last_login(&self, id: i64) -> Result<User, DbError>;
}
