//! Signup payload and token claims

use account_db::{NewUser, SanitizedUser, User, utils::non_empty};
use serde::{Deserialize, Serialize};

/// Signup payload accepted by [`crate::UserService::create_user`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl CreateUser {
    /// Drop empty strings so that `""` counts as absent everywhere
    pub(crate) fn normalized(self) -> Self {
        Self {
            username: non_empty(self.username),
            password: non_empty(self.password),
            mobile: non_empty(self.mobile),
            first_name: non_empty(self.first_name),
            last_name: non_empty(self.last_name),
            email: non_empty(self.email),
        }
    }

    /// Build the record to insert, given the already hashed password
    pub(crate) fn into_new_user(self, password_hash: Option<String>) -> NewUser {
        NewUser {
            username: self.username,
            password: password_hash,
            mobile: self.mobile,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        }
    }
}

/// Claims embedded in a token by an external signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Subject (user ID)
    pub sub: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

impl From<&User> for TokenPayload {
    fn from(user: &User) -> Self {
        Self {
            sub: user.id,
            username: user.username.clone(),
            mobile: user.mobile.clone(),
        }
    }
}

impl From<&SanitizedUser> for TokenPayload {
    fn from(user: &SanitizedUser) -> Self {
        Self {
            sub: user.id,
            username: user.username.clone(),
            mobile: user.mobile.clone(),
        }
    }
}
