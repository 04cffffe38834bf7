//! Authentication utilities library
//!
//! Provides the credential and token layer of the blog backend:
//! - Password hashing (Argon2id)
//! - JWT token issuance and verification
//! - A bearer gate turning `Authorization` headers into verified claims
//! - Authentication coordination
//!
//! Services adapt these pieces to their own HTTP framework and storage.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("My_password", &hash));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{AuthConfig, Claims, JwtHandler};
//! use chrono::Duration;
//!
//! let config = AuthConfig::new(b"secret_key_at_least_32_bytes_long!", "HS256", Duration::minutes(15)).unwrap();
//! let handler = JwtHandler::new(&config);
//! let issued = handler.issue(Claims::new().with_subject("alice"), None).unwrap();
//! let decoded = handler.verify(&issued.token).unwrap();
//! assert_eq!(decoded.sub.as_deref(), Some("alice"));
//! ```
//!
//! ## Bearer Gate
//! ```
//! use auth::{AuthConfig, Authenticator, Claims, GateOutcome, GateRejection};
//! use chrono::Duration;
//!
//! let config = AuthConfig::new(b"secret_key_at_least_32_bytes_long!", "HS256", Duration::minutes(15)).unwrap();
//! let auth = Authenticator::new(&config).unwrap();
//! let gate = auth.gate();
//!
//! assert_eq!(gate.authorize(None), GateOutcome::Rejected(GateRejection::MissingCredential));
//!
//! let issued = auth.issue_token(Claims::for_user("1", "alice"), None).unwrap();
//! let header = format!("Bearer {}", issued.token);
//! assert!(matches!(gate.authorize(Some(&header)), GateOutcome::Verified(_)));
//! ```

pub mod authenticator;
pub mod bearer;
pub mod config;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use bearer::BearerGate;
pub use bearer::GateOutcome;
pub use bearer::GateRejection;
pub use config::AuthConfig;
pub use config::ConfigError;
pub use config::PasswordCost;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
