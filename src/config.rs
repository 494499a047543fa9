//! Configuration manager.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
/// Shipped in example files; refused as a real secret.
pub const PLACEHOLDER_SECRET: &str = "your-secret-key-here-change-in-production";
const MIN_SECRET_LENGTH: usize = 32;
/// Longest accepted token lifetime, one year.
const MAX_TOKEN_TTL: u64 = 365 * 24 * 60 * 60;

/// Errors raised while loading or checking the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot parse configuration file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("`token.secret_key` must be set")]
    MissingSecret,
    #[error("`token.secret_key` must be at least {MIN_SECRET_LENGTH} bytes")]
    ShortSecret,
    #[error("`token.secret_key` still has its placeholder value")]
    PlaceholderSecret,
    #[error("unsupported `token.algorithm` {0:?}, expected HS256, HS384 or HS512")]
    Algorithm(String),
    #[error("`token.{0}` must be greater than zero")]
    Ttl(&'static str),
    #[error("`token.{0}` must not exceed {MAX_TOKEN_TTL} seconds")]
    TtlTooLong(&'static str),
    #[error("`api_prefix` must be empty or start with '/'")]
    ApiPrefix,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Instance name, also used as token issuer.
    pub name: String,
    pub environment: Environment,
    /// Socket address to bind.
    pub address: String,
    /// Prefix of every API route.
    pub api_prefix: String,
    /// Allowed CORS origins. Empty allows any.
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub token: Token,
    /// Related to PostgreSQL configuration.
    #[serde(skip_serializing)]
    pub postgres: Option<Postgres>,
    /// Related to Argon2 configuration.
    #[serde(skip_serializing)]
    pub argon2: Option<Argon2>,
    #[serde(skip)]
    path: PathBuf,
    /// Why defaults were used instead of the file, if they were.
    #[serde(skip)]
    fallback: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: "dhakacart".into(),
            environment: Environment::default(),
            address: "0.0.0.0:8000".into(),
            api_prefix: "/api/v1".into(),
            cors_origins: Vec::new(),
            token: Token::default(),
            postgres: None,
            argon2: None,
            path: PathBuf::new(),
            fallback: None,
        }
    }
}

/// Json Web Token configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    pub secret_key: Zeroizing<String>,
    pub algorithm: String,
    /// Access token lifetime, in seconds.
    pub access_token_ttl: u64,
    /// Refresh token lifetime, in seconds.
    pub refresh_token_ttl: u64,
}

impl Default for Token {
    fn default() -> Self {
        Self {
            secret_key: Zeroizing::new(String::new()),
            algorithm: "HS256".into(),
            access_token_ttl: 30 * 60,
            refresh_token_ttl: 7 * 24 * 60 * 60,
        }
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("secret_key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

/// PostgreSQL configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Postgres {
    /// Hostname:(?port) for PostgreSQL instance.
    pub address: String,
    /// Database name.
    pub database: Option<String>,
    /// Username credential to connect.
    pub username: Option<String>,
    /// Password credential to connect.
    pub password: Option<String>,
    /// Maximum pool connections.
    pub pool_size: Option<u32>,
}

/// Argon2 configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Argon2 {
    /// Memory used while hashing, in KiB.
    pub memory_cost: u32,
    /// Iterations of hash.
    pub iterations: u32,
    /// Parallelism degree.
    pub parallelism: u32,
}

impl Default for Argon2 {
    fn default() -> Self {
        Self {
            memory_cost: 1024 * 64, // 64 MiB.
            iterations: 4,
            parallelism: 2,
        }
    }
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location, then applies environment overrides.
    ///
    /// A missing file falls back to defaults, see [`Configuration::fallback`];
    /// a malformed one is an error.
    pub fn read(self) -> Result<Self, ConfigError> {
        let file_path = if self.path.is_file() {
            self.path.clone()
        } else {
            std::env::var("CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| Path::new(DEFAULT_CONFIG_PATH).to_path_buf())
        };

        let config = match File::open(&file_path) {
            Ok(file) => serde_yaml::from_reader(file)?,
            Err(err) => Self {
                fallback: Some(err.to_string()),
                ..Self::default()
            },
        };

        Ok(config.path(file_path).with_env())
    }

    /// File the configuration was read from, or looked for.
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Reason the file could not be opened when defaults were used.
    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// `SECRET_KEY` and `POSTGRES_PASSWORD` take precedence over the file.
    fn with_env(mut self) -> Self {
        if let Ok(secret) = std::env::var("SECRET_KEY") {
            self.token.secret_key = Zeroizing::new(secret);
        }

        if let (Some(postgres), Ok(password)) =
            (self.postgres.as_mut(), std::env::var("POSTGRES_PASSWORD"))
        {
            postgres.password = Some(password);
        }

        self
    }

    /// Checks settings the service cannot run safely without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.token.secret_key.as_str();

        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if secret == PLACEHOLDER_SECRET {
            return Err(ConfigError::PlaceholderSecret);
        }
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::ShortSecret);
        }

        if !adapters::outbound::jwt::SUPPORTED_ALGORITHMS
            .contains(&self.token.algorithm.as_str())
        {
            return Err(ConfigError::Algorithm(self.token.algorithm.clone()));
        }

        for (name, ttl) in [
            ("access_token_ttl", self.token.access_token_ttl),
            ("refresh_token_ttl", self.token.refresh_token_ttl),
        ] {
            if ttl == 0 {
                return Err(ConfigError::Ttl(name));
            }
            if ttl > MAX_TOKEN_TTL {
                return Err(ConfigError::TtlTooLong(name));
            }
        }

        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ConfigError::ApiPrefix);
        }

        Ok(())
    }

    /// Argon2 settings, defaults when the section is absent.
    pub fn argon2(&self) -> Argon2 {
        self.argon2.clone().unwrap_or_default()
    }
}
