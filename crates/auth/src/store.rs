//! Persistence of user records.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::StoreError;
use crate::model::{NewUser, UserRecord};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Capability the auth service needs from whatever holds user records.
///
/// Implementations must enforce email uniqueness themselves and report a
/// clash as [`StoreError::DuplicateEmail`].
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn find_by_email_and_username(
        &self,
        email: &str,
        username: &str,
    ) -> StoreResult<Option<UserRecord>>;

    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord>;

    async fn update_email(&self, current_email: &str, new_email: &str) -> StoreResult<()>;
}

const USER_COLUMNS: &str = "id, username, email, password_hash, salt, created_at, updated_at";

/// [`CredentialStore`] over the `users` table.
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Unavailable(err)
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1");
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email_and_username(
        &self,
        email: &str,
        username: &str,
    ) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? AND username = ? LIMIT 1");
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, salt, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.salt)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update_email(&self, current_email: &str, new_email: &str) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET email = ?, updated_at = ? WHERE email = ?")
            .bind(new_email)
            .bind(Utc::now())
            .bind(current_email)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteCredentialStore {
        SqliteCredentialStore::new(filekeep_core::memory_pool().await.unwrap())
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            salt: "salt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = store().await;

        let created = store.insert(new_user("alice_99", "a@b.com")).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.username, "alice_99");

        let by_email = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_both = store
            .find_by_email_and_username("a@b.com", "alice_99")
            .await
            .unwrap();
        assert!(by_both.is_some());

        let wrong_name = store
            .find_by_email_and_username("a@b.com", "bob")
            .await
            .unwrap();
        assert!(wrong_name.is_none());

        assert!(store.find_by_email("missing@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected_by_store() {
        let store = store().await;

        store.insert(new_user("alice_99", "a@b.com")).await.unwrap();
        let err = store.insert(new_user("bob_1", "a@b.com")).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_update_email() {
        let store = store().await;
        store.insert(new_user("alice_99", "a@b.com")).await.unwrap();

        store.update_email("a@b.com", "new@b.com").await.unwrap();

        assert!(store.find_by_email("a@b.com").await.unwrap().is_none());
        assert!(store.find_by_email("new@b.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_email_conflicts() {
        let store = store().await;
        store.insert(new_user("alice_99", "a@b.com")).await.unwrap();
        store.insert(new_user("bob_1", "c@d.com")).await.unwrap();

        let err = store.update_email("a@b.com", "c@d.com").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let err = store.update_email("nobody@b.com", "x@y.com").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
