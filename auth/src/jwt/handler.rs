use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::config::AuthConfig;

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Expiration time (Unix timestamp)
    pub expires_at: i64,
}

/// JWT token handler for issuing and verifying tokens.
///
/// Stateless: validity is a function of signature and expiry only, so there
/// is no way to revoke a token before it expires.
#[derive(Clone)]
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
    leeway_seconds: u64,
}

impl JwtHandler {
    /// Create a new JWT handler from validated configuration.
    ///
    /// # Arguments
    /// * `config` - Secret, algorithm, default TTL and leeway
    ///
    /// # Returns
    /// JwtHandler instance signing and verifying with the configured algorithm
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            algorithm: config.algorithm(),
            default_ttl: config.default_ttl(),
            leeway_seconds: config.leeway_seconds(),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign claims into a token that expires `ttl` from now.
    ///
    /// # Arguments
    /// * `claims` - Caller claims; `iat` and `exp` are overwritten
    /// * `ttl` - Token lifetime (configured default when `None`)
    ///
    /// # Errors
    /// * `NonPositiveTtl` - TTL is zero or negative
    /// * `TtlOutOfRange` - Expiry falls outside the representable time range
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, claims: Claims, ttl: Option<Duration>) -> Result<IssuedToken, JwtError> {
        self.issue_at(claims, ttl, Utc::now())
    }

    /// Same as [`JwtHandler::issue`] with an explicit issuance instant.
    pub fn issue_at(
        &self,
        mut claims: Claims,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl <= Duration::zero() {
            return Err(JwtError::NonPositiveTtl);
        }

        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(JwtError::TtlOutOfRange)?
            .timestamp();
        claims.iat = Some(now.timestamp());
        claims.exp = Some(expires_at);

        let header = Header::new(self.algorithm);
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature mismatch, wrong algorithm, malformed token,
    ///   or not yet valid (`nbf`)
    /// * `MissingClaim` - Token carries no `exp`
    /// * `TokenExpired` - Current time is at or past `exp` (plus leeway)
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_at(token, Utc::now())
    }

    /// Same as [`JwtHandler::verify`] evaluated at `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Time-based checks run below against `now` instead of the system clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?
            .claims;

        if claims.exp.is_none() {
            return Err(JwtError::MissingClaim("exp".to_string()));
        }

        let now = now.timestamp();
        if claims.is_expired_at(now, self.leeway_seconds) {
            return Err(JwtError::TokenExpired);
        }

        let leeway = i64::try_from(self.leeway_seconds).unwrap_or(i64::MAX);
        if let Some(nbf) = claims.nbf {
            if now.saturating_add(leeway) < nbf {
                return Err(JwtError::InvalidToken("Token is not yet valid".to_string()));
            }
        }

        Ok(claims)
    }
}
