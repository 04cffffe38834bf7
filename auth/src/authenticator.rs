use chrono::Duration;

use crate::bearer::BearerGate;
use crate::config::AuthConfig;
use crate::jwt::Claims;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

const TOKEN_TYPE: &str = "bearer";

/// Plaintext hashed once at construction; unknown-account logins verify against it.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and JWT token handling.
#[derive(Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    dummy_hash: String,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `config` - Validated signing and hashing configuration
    ///
    /// # Returns
    /// Configured Authenticator instance
    ///
    /// # Errors
    /// * `HashingFailed` - The hash used for unknown-account logins could not be built
    pub fn new(config: &AuthConfig) -> Result<Self, PasswordError> {
        let password_hasher = PasswordHasher::with_cost(config.password_cost());
        let dummy_hash = password_hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            jwt_handler: JwtHandler::new(config),
            dummy_hash,
        })
    }

    pub fn password_hasher(&self) -> &PasswordHasher {
        &self.password_hasher
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Password too long or hashing failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - JWT claims to encode in token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match (or the stored hash is corrupt)
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let ttl = self.jwt_handler.default_ttl();
        let issued = self.jwt_handler.issue(claims, Some(ttl))?;

        Ok(AuthenticationResult {
            access_token: issued.token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: ttl.num_seconds(),
        })
    }

    /// Spend the same hashing cost as a real login, then fail.
    ///
    /// Used when no account matches the submitted username.
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify(password, &self.dummy_hash);
        AuthenticationError::InvalidCredentials
    }

    /// Generate JWT token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(
        &self,
        claims: Claims,
        ttl: Option<Duration>,
    ) -> Result<IssuedToken, JwtError> {
        self.jwt_handler.issue(claims, ttl)
    }

    /// Validate and decode JWT token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }

    /// Bearer gate sharing this authenticator's verifier.
    pub fn gate(&self) -> BearerGate {
        BearerGate::new(self.jwt_handler.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bearer::GateOutcome;
    use crate::config::PasswordCost;

    fn authenticator() -> Authenticator {
        let config = AuthConfig::new(
            "test_secret_key_at_least_32_bytes!",
            "HS256",
            Duration::minutes(30),
        )
        .unwrap()
        .with_password_cost(PasswordCost::new(8, 1, 1).unwrap());
        Authenticator::new(&config).expect("Failed to build authenticator")
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        // Hash a password
        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        // Authenticate with correct password
        let claims = Claims::new().with_subject("user123");
        let result = authenticator
            .authenticate(password, &hash, claims)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());
        assert_eq!(result.token_type, "bearer");
        assert_eq!(result.expires_in, 30 * 60);

        // Validate the token
        let decoded = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded.sub, Some("user123".to_string()));
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let claims = Claims::new().with_subject("user123");

        // Try with wrong password
        let result = authenticator.authenticate("wrong_password", &hash, claims);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_corrupt_hash() {
        let authenticator = authenticator();

        let result = authenticator.authenticate("my_password", "not-a-phc-string", Claims::new());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_reject_unknown_account() {
        let authenticator = authenticator();

        assert!(authenticator
            .password_hasher
            .verify(DUMMY_PASSWORD, &authenticator.dummy_hash));
        assert!(matches!(
            authenticator.reject_unknown_account(DUMMY_PASSWORD),
            AuthenticationError::InvalidCredentials
        ));
    }

    #[test]
    fn test_issue_and_validate_token() {
        let authenticator = authenticator();

        let claims = Claims::new().with_subject("user123").with_issuer("test");

        let issued = authenticator
            .issue_token(claims, Some(Duration::minutes(1)))
            .expect("Failed to generate token");

        let decoded = authenticator
            .validate_token(&issued.token)
            .expect("Failed to validate token");

        assert_eq!(decoded.sub, Some("user123".to_string()));
        assert_eq!(decoded.iss, Some("test".to_string()));
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator();

        let result = authenticator.validate_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_gate_accepts_issued_token() {
        let authenticator = authenticator();
        let issued = authenticator
            .issue_token(Claims::for_user("7", "bob"), None)
            .unwrap();

        let outcome = authenticator
            .gate()
            .authorize(Some(&format!("Bearer {}", issued.token)));
        assert!(matches!(outcome, GateOutcome::Verified(ref c) if c.username() == Some("bob")));
    }
}
