//! SQLite connection pool and schema migrations.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Open the database at `url`, creating the file if needed, and apply pending migrations.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    migrate(&pool).await?;

    tracing::info!(url, "database ready");
    Ok(pool)
}

/// In-memory database with the schema applied.
///
/// Every connection to `sqlite::memory:` gets its own database, so the pool holds
/// exactly one connection and never recycles it.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_pool_has_schema() {
        let pool = memory_pool().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'file_logs') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(names, vec!["file_logs", "users"]);
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let pool = memory_pool().await.unwrap();
        let insert = "INSERT INTO users (username, email, password_hash, salt, created_at, updated_at)
                      VALUES (?, 'a@b.com', 'h', 's', '', '')";

        sqlx::query(insert).bind("first").execute(&pool).await.unwrap();
        let err = sqlx::query(insert).bind("second").execute(&pool).await.unwrap_err();

        assert!(matches!(err, sqlx::Error::Database(ref e) if e.is_unique_violation()));
    }
}
