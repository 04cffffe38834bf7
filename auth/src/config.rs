use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Error type for invalid authentication configuration.
///
/// Raised once at startup; a process holding an `AuthConfig` never sees it again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Unsupported signing algorithm: {0} (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),

    #[error("Token TTL must be positive")]
    NonPositiveTtl,

    #[error("Token TTL is too large to represent")]
    TtlOutOfRange,

    #[error("Invalid password cost parameters: {0}")]
    InvalidPasswordCost(String),
}

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl PasswordCost {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, ConfigError> {
        argon2::Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| ConfigError::InvalidPasswordCost(e.to_string()))?;

        Ok(Self {
            memory_kib,
            iterations,
            parallelism,
        })
    }

    pub(crate) fn params(&self) -> argon2::Params {
        // Checked in `new`; the default arm only guards values built by hand.
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .unwrap_or_default()
    }
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

/// Validated configuration for password hashing and token signing.
///
/// Built once at process start and shared read-only afterwards.
#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    algorithm: Algorithm,
    default_ttl: Duration,
    leeway_seconds: u64,
    password_cost: PasswordCost,
}

impl AuthConfig {
    /// Create a validated configuration.
    ///
    /// # Arguments
    /// * `secret` - Shared HMAC signing secret
    /// * `algorithm` - Algorithm name (`HS256`, `HS384` or `HS512`)
    /// * `default_ttl` - Token lifetime applied when the caller does not pass one
    ///
    /// # Errors
    /// * `EmptySecret` - Secret is empty
    /// * `UnsupportedAlgorithm` - Unknown or non-HMAC algorithm
    /// * `NonPositiveTtl` - TTL is zero or negative
    pub fn new(
        secret: impl AsRef<[u8]>,
        algorithm: &str,
        default_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        let secret = secret.as_ref().to_vec();
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let algorithm = parse_hmac_algorithm(algorithm)?;

        if default_ttl <= Duration::zero() {
            return Err(ConfigError::NonPositiveTtl);
        }

        if secret.len() < 32 {
            tracing::warn!(
                secret_len = secret.len(),
                "Signing secret is shorter than 32 bytes"
            );
        }

        Ok(Self {
            secret,
            algorithm,
            default_ttl,
            leeway_seconds: 0,
            password_cost: PasswordCost::default(),
        })
    }

    /// Tolerate clock skew of `seconds` when checking expiry.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn with_password_cost(mut self, cost: PasswordCost) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn leeway_seconds(&self) -> u64 {
        self.leeway_seconds
    }

    pub fn password_cost(&self) -> PasswordCost {
        self.password_cost
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("default_ttl", &self.default_ttl)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("password_cost", &self.password_cost)
            .finish()
    }
}

fn parse_hmac_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(name.trim()) {
        Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(algorithm),
        _ => Err(ConfigError::UnsupportedAlgorithm(name.to_string())),
    }
}
