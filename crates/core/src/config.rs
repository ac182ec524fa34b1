use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_token_expiry")]
    pub token_expiry_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: default_database_url() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { upload_dir: default_upload_dir() }
    }
}

fn default_database_url() -> String {
    "sqlite://filekeep.db".to_string()
}

fn default_issuer() -> String {
    "filekeep".to_string()
}

fn default_audience() -> String {
    "filekeep-clients".to_string()
}

fn default_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

const ENV_PREFIX: &str = "FILEKEEP";

/// Longest token lifetime accepted from configuration (one year)
pub const MAX_TOKEN_EXPIRY_SECONDS: i64 = 365 * 24 * 60 * 60;

impl AppConfig {
    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let expiry = self.auth.token_expiry_seconds;
        if !(1..=MAX_TOKEN_EXPIRY_SECONDS).contains(&expiry) {
            return Err(ConfigError::Message(format!(
                "auth.token_expiry_seconds must be between 1 and {}, got {}",
                MAX_TOKEN_EXPIRY_SECONDS, expiry
            )));
        }
        Ok(())
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Variables are prefixed with `FILEKEEP_` and nested with `__`,
    /// e.g. `FILEKEEP_AUTH__JWT_SECRET`, `FILEKEEP_SERVER__PORT`.
    ///
    /// Returns the config and the keys that were overridden from the environment.
    pub fn load_with_env() -> Result<(Self, Vec<String>), ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("filekeep").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let env_vars = [
            ("FILEKEEP_DATABASE__URL", "database.url"),
            ("FILEKEEP_AUTH__JWT_SECRET", "auth.jwt_secret"),
            ("FILEKEEP_AUTH__ISSUER", "auth.issuer"),
            ("FILEKEEP_AUTH__AUDIENCE", "auth.audience"),
            ("FILEKEEP_AUTH__TOKEN_EXPIRY_SECONDS", "auth.token_expiry_seconds"),
            ("FILEKEEP_SERVER__HOST", "server.host"),
            ("FILEKEEP_SERVER__PORT", "server.port"),
            ("FILEKEEP_STORAGE__UPLOAD_DIR", "storage.upload_dir"),
        ];

        let overrides = env_vars
            .iter()
            .filter(|(env_var, _)| std::env::var(env_var).is_ok())
            .map(|(_, key)| key.to_string())
            .collect();

        let app_config = Self::from_builder(builder)?;
        Ok((app_config, overrides))
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_token_expiry(), 3600);
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 3000);
        assert_eq!(default_upload_dir(), PathBuf::from("uploads"));
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let config = parse(
            r#"
            [auth]
            jwt_secret = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.jwt_secret, "secret");
        assert_eq!(config.auth.issuer, "filekeep");
        assert_eq!(config.auth.audience, "filekeep-clients");
        assert_eq!(config.auth.token_expiry_seconds, 3600);
        assert_eq!(config.database.url, "sqlite://filekeep.db");
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_full_toml() {
        let config = parse(
            r#"
            [database]
            url = "sqlite://test.db"

            [auth]
            jwt_secret = "k"
            issuer = "iss"
            audience = "aud"
            token_expiry_seconds = 60

            [server]
            host = "127.0.0.1"
            port = 8080

            [storage]
            upload_dir = "/tmp/uploads"
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.token_expiry_seconds, 60);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.storage.upload_dir, PathBuf::from("/tmp/uploads"));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = parse(
            r#"
            [auth]
            issuer = "iss"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_token_expiry_bounds() {
        for expiry in ["0", "-60", "9223372036854775807"] {
            let result = parse(&format!(
                "[auth]\njwt_secret = \"k\"\ntoken_expiry_seconds = {}\n",
                expiry
            ));
            assert!(result.is_err(), "expiry {} accepted", expiry);
        }

        let config = parse(&format!(
            "[auth]\njwt_secret = \"k\"\ntoken_expiry_seconds = {}\n",
            MAX_TOKEN_EXPIRY_SECONDS
        ))
        .unwrap();
        assert_eq!(config.auth.token_expiry_seconds, MAX_TOKEN_EXPIRY_SECONDS);
    }
}
