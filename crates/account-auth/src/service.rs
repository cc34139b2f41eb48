//! Account service: the only place passwords are hashed or compared

use account_db::{Sanitize, SanitizedUser, UserFilter, UserStore};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::password::{hash_password, verify_password};
use crate::payload::{CreateUser, TokenPayload};

const MISSING_IDENTITY: &str =
    "User should at least contain a valid username and password, or a mobile number";

/// User service contract consumed by an authentication host.
///
/// Every user value crossing this boundary is sanitized.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Look up a user by username and check the password.
    ///
    /// A stored hash that cannot be parsed is reported as
    /// [`AuthError::PasswordHash`], an internal error, rather than
    /// `InvalidCredentials`: it means the record is corrupt, not that the
    /// caller supplied the wrong password.
    async fn find_by_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SanitizedUser, AuthError>;

    /// Register a new user
    async fn create_user(&self, data: CreateUser) -> Result<SanitizedUser, AuthError>;

    /// Look up a user by ID
    async fn find_user_by_id(&self, id: i64) -> Result<SanitizedUser, AuthError>;

    /// Claims to embed in a token for this user
    fn token_payload(&self, user: &SanitizedUser) -> TokenPayload {
        TokenPayload::from(user)
    }

    /// Rehydrate the user a previously issued token refers to
    async fn validate_token_payload(
        &self,
        payload: &TokenPayload,
    ) -> Result<SanitizedUser, AuthError> {
        self.find_user_by_id(payload.sub).await
    }
}

/// [`UserService`] implementation over any [`UserStore`]
#[derive(Clone)]
pub struct AccountService<S> {
    store: S,
}

impl<S: UserStore> AccountService<S> {
    /// Create a new account service backed by the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stamp the user's last login time and return the refreshed record
    pub async fn record_login(&self, id: i64) -> Result<SanitizedUser, AuthError> {
        let user = self.store.touch_last_login(id).await?;
        debug!("Recorded login for user {}", id);
        Ok(user.sanitize())
    }
}

#[async_trait]
impl<S: UserStore> UserService for AccountService<S> {
    async fn find_by_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SanitizedUser, AuthError> {
        let user = self
            .store
            .find_one(&UserFilter::Username(username.to_string()))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Mobile-only accounts have nothing to compare against
        let Some(hash) = user.password.clone() else {
            warn!("Password login attempted for user {} without a password", user.id);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_blocking(password.to_string(), hash).await? {
            warn!("Invalid password for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        debug!("Credentials verified for user {}", user.id);
        Ok(user.sanitize())
    }

    async fn create_user(&self, data: CreateUser) -> Result<SanitizedUser, AuthError> {
        let mut data = data.normalized();

        let filter = match (&data.username, &data.password, &data.mobile) {
            (Some(username), Some(_), _) => UserFilter::Username(username.clone()),
            (_, _, Some(mobile)) => UserFilter::Mobile(mobile.clone()),
            _ => return Err(AuthError::Validation(MISSING_IDENTITY.to_string())),
        };

        if self.store.find_one(&filter).await?.is_some() {
            debug!("Signup rejected, {} already taken", filter.column());
            return Err(AuthError::Validation(format!(
                "A user with this {} already exists",
                filter.column()
            )));
        }

        let password_hash = match data.password.take() {
            Some(password) => Some(hash_blocking(password).await?),
            None => None,
        };

        // The store's unique constraints still catch a concurrent signup
        // that slipped past the lookup above; that surfaces as Validation.
        let user = self.store.save(data.into_new_user(password_hash)).await?;

        info!("Created user {}", user.id);
        Ok(user.sanitize())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<SanitizedUser, AuthError> {
        self.store
            .find_one(&UserFilter::Id(id))
            .await?
            .map(|user| user.sanitize())
            .ok_or(AuthError::UserNotFound)
    }
}

async fn hash_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::PasswordHash(format!("Task join error: {}", e)))?
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::PasswordHash(format!("Task join error: {}", e)))?
}
