use std::env;

use auth::AuthConfig;
use auth::PasswordCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_access_token_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
    #[serde(default)]
    pub leeway_seconds: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

/// Argon2 work factor for new password hashes.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let cost = PasswordCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

/// Allowed browser origins. Empty or `*` allows any origin.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_permissive(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn default_max_connections() -> u32 {
    5
}

/// Unprefixed variables with `__` as the nesting separator: JWT__SECRET overrides jwt.secret.
fn environment_overrides() -> Environment {
    Environment::default()
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_ttl_minutes() -> i64 {
    30
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(environment_overrides())
    }

    fn load_with(environment: Environment) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables
            .add_source(environment)
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Validate the token and password settings and build the auth configuration.
    ///
    /// # Errors
    /// * `auth::ConfigError` - Empty secret, unsupported algorithm,
    ///   non-positive or out-of-range TTL, invalid password cost
    pub fn auth_config(&self) -> Result<AuthConfig, auth::ConfigError> {
        let cost = PasswordCost::new(
            self.password.memory_kib,
            self.password.iterations,
            self.password.parallelism,
        )?;

        Ok(AuthConfig::new(
            self.jwt.secret.as_bytes(),
            &self.jwt.algorithm,
            chrono::Duration::try_minutes(self.jwt.access_token_ttl_minutes)
                .ok_or(auth::ConfigError::TtlOutOfRange)?,
        )?
        .with_leeway(self.jwt.leeway_seconds)
        .with_password_cost(cost))
    }
}
