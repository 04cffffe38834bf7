use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Generic JWT claims structure.
///
/// Supports standard RFC 7519 claims plus custom fields via `extra` map.
/// `exp` and `iat` are filled in by the issuer; whatever the caller sets
/// there is overwritten at issuance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user/entity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims identifying an account.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier, stored as `sub`
    /// * `username` - Username (stored in `extra.username`)
    ///
    /// # Returns
    /// Claims with sub and username set; expiry is added when issued
    pub fn for_user(user_id: impl ToString, username: impl Into<String>) -> Self {
        Self::new()
            .with_subject(user_id)
            .with_extra("username", username.into())
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set not-before (Unix timestamp).
    pub fn with_not_before(mut self, nbf: i64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Set audience.
    pub fn with_audience(mut self, aud: impl Into<String>) -> Self {
        self.aud = Some(aud.into());
        self
    }

    /// Set token identifier.
    pub fn with_jti(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Get username from extra fields (convenience method).
    pub fn username(&self) -> Option<&str> {
        self.extra.get("username").and_then(|v| v.as_str())
    }

    /// Check whether the token has expired at `now`.
    ///
    /// A token is live strictly before `exp`; `leeway_seconds` extends that
    /// window to absorb clock skew. Claims without `exp` count as expired.
    pub fn is_expired_at(&self, now: i64, leeway_seconds: u64) -> bool {
        let leeway = i64::try_from(leeway_seconds).unwrap_or(i64::MAX);
        self.exp
            .map_or(true, |exp| now >= exp.saturating_add(leeway))
    }
}
