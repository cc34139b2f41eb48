//! User operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use crate::error::DbError;
use crate::models::{NewUser, User, UserFilter};
use crate::repository::Database;
use crate::store::UserStore;

const USER_COLUMNS: &str = "id, username, password, mobile, first_name, last_name, email, \
                            last_login, created_at, updated_at";

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO "user" (username, password, mobile, first_name, last_name, email, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.mobile)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "user"))?;

        let id: i64 = result.get("id");
        debug!("Inserted user {}", id);

        Ok(User {
            id,
            username: user.username,
            password: user.password,
            mobile: user.mobile,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get the first user matching a single-field filter
    pub async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>, DbError> {
        let sql = format!(
            r#"SELECT {} FROM "user" WHERE {} = ? LIMIT 1"#,
            USER_COLUMNS,
            filter.column()
        );
        let query = sqlx::query(&sql);
        let query = match filter {
            UserFilter::Id(id) => query.bind(*id),
            UserFilter::Username(username) => query.bind(username.as_str()),
            UserFilter::Mobile(mobile) => query.bind(mobile.as_str()),
        };

        let result = query.fetch_optional(&self.pool).await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        self.find_user(&UserFilter::Id(id)).await
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        self.find_user(&UserFilter::Username(username.to_string())).await
    }

    /// Stamp the user's last login time
    pub async fn update_last_login(&self, id: i64) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE "user"
            SET last_login = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query(r#"SELECT COUNT(*) as count FROM "user""#)
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[async_trait]
impl UserStore for Database {
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, DbError> {
        self.find_user(filter).await
    }

    async fn save(&self, user: NewUser) -> Result<User, DbError> {
        self.insert_user(user).await
    }

    async fn touch_last_login(&self, id: i64) -> Result<User, DbError> {
        let not_found = || DbError::NotFound(format!("user {}", id));
        if !self.update_last_login(id).await? {
            return Err(not_found());
        }
        self.get_user_by_id(id).await?.ok_or_else(not_found)
    }
}
