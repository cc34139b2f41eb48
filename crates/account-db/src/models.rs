//! Database models

use crate::utils::{parse_datetime_or_now, parse_optional_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// Persisted user record
///
/// `password` holds a PHC-format hash, never plaintext. It is skipped on
/// serialization, but callers outside the account service should only ever
/// see a [`SanitizedUser`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub mobile: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User record with the password credential removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedUser {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection that strips the password from a user value.
///
/// Implemented for both [`User`] and [`SanitizedUser`] so that sanitizing an
/// already sanitized value is a no-op.
pub trait Sanitize {
    fn sanitize(&self) -> SanitizedUser;
}

impl Sanitize for User {
    fn sanitize(&self) -> SanitizedUser {
        SanitizedUser {
            id: self.id,
            username: self.username.clone(),
            mobile: self.mobile.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Sanitize for SanitizedUser {
    fn sanitize(&self) -> SanitizedUser {
        self.clone()
    }
}

impl From<User> for SanitizedUser {
    fn from(user: User) -> Self {
        SanitizedUser {
            id: user.id,
            username: user.username,
            mobile: user.mobile,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// New user (for insertion)
///
/// `password` must already be hashed.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: Option<String>,
    pub password: Option<String>,
    pub mobile: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Single-field equality filter for user lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(i64),
    Username(String),
    Mobile(String),
}

impl UserFilter {
    /// Column the filter matches against
    pub fn column(&self) -> &'static str {
        match self {
            UserFilter::Id(_) => "id",
            UserFilter::Username(_) => "username",
            UserFilter::Mobile(_) => "mobile",
        }
    }
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let last_login: Option<String> = row.try_get("last_login")?;
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password: row.try_get("password")?,
            mobile: row.try_get("mobile")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            last_login: parse_optional_datetime(last_login.as_deref()),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            username: Some("alice".to_string()),
            password: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string()),
            mobile: None,
            first_name: Some("Alice".to_string()),
            last_name: None,
            email: Some("alice@example.com".to_string()),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_sanitize_drops_password() {
        let user = sample_user();
        let sanitized = user.sanitize();

        assert_eq!(sanitized.id, 7);
        assert_eq!(sanitized.username.as_deref(), Some("alice"));
        assert_eq!(sanitized.email.as_deref(), Some("alice@example.com"));

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_sanitize_does_not_mutate_source() {
        let user = sample_user();
        let _ = user.sanitize();
        assert!(user.password.is_some());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let user = sample_user();
        let once = user.sanitize();
        let twice = once.sanitize();
        assert_eq!(once, twice);
        assert_eq!(SanitizedUser::from(user), once);
    }

    #[test]
    fn test_user_serialization_skips_password() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(json.contains("\"firstName\""));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_filter_columns() {
        assert_eq!(UserFilter::Id(1).column(), "id");
        assert_eq!(UserFilter::Username("a".into()).column(), "username");
        assert_eq!(UserFilter::Mobile("1".into()).column(), "mobile");
    }
}
