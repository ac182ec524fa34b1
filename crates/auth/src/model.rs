use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored user record, including credential material.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// Base64 text of the per-record salt
    pub salt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to persist a freshly registered user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
}

/// Public projection of a user; never carries hash or salt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&UserRecord> for UserView {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
        }
    }
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
        }
    }
}

/// Credentials plus the email the caller wants to switch to.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub password: String,
    /// New email address
    pub email: String,
}
