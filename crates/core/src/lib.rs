pub mod config;
pub mod db;
pub mod logging;

pub use config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig, StorageConfig};
pub use db::{connect, memory_pool};
