//! Bearer credential gate.
//!
//! Turns the raw `Authorization` header value of a request into either the
//! verified claims or the reason the request must be denied. It knows
//! nothing about any HTTP framework; the caller decides how a rejection is
//! rendered and must not run the downstream handler on one.

use std::fmt;

use crate::jwt::Claims;
use crate::jwt::JwtHandler;

const BEARER_SCHEME: &str = "bearer";

/// Why the gate denied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// No `Authorization` header was sent.
    MissingCredential,
    /// The header uses a scheme other than `Bearer`, or cannot be parsed.
    UnsupportedScheme,
    /// Signature, structure or expiry check failed.
    InvalidOrExpiredToken,
}

impl GateRejection {
    /// Message safe to return to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            GateRejection::MissingCredential => "Missing Authorization header",
            GateRejection::UnsupportedScheme => "Unsupported authorization scheme",
            GateRejection::InvalidOrExpiredToken => "Invalid or expired token",
        }
    }
}

impl fmt::Display for GateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.public_message())
    }
}

/// Result of running the gate on one request.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    Verified(Claims),
    Rejected(GateRejection),
}

impl GateOutcome {
    pub fn into_result(self) -> Result<Claims, GateRejection> {
        match self {
            GateOutcome::Verified(claims) => Ok(claims),
            GateOutcome::Rejected(reason) => Err(reason),
        }
    }
}

/// Request guard verifying `Authorization: Bearer <token>` headers.
#[derive(Clone)]
pub struct BearerGate {
    jwt_handler: JwtHandler,
}

impl BearerGate {
    pub fn new(jwt_handler: JwtHandler) -> Self {
        Self { jwt_handler }
    }

    /// Run the gate against the value of the `Authorization` header.
    ///
    /// # Arguments
    /// * `header` - Header value, `None` when the request carries no header
    ///
    /// # Returns
    /// `Verified` with the decoded claims, or `Rejected` with the reason
    pub fn authorize(&self, header: Option<&str>) -> GateOutcome {
        let token = match extract_bearer_token(header) {
            Ok(token) => token,
            Err(reason) => return GateOutcome::Rejected(reason),
        };

        match self.jwt_handler.verify(token) {
            Ok(claims) => GateOutcome::Verified(claims),
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token rejected");
                GateOutcome::Rejected(GateRejection::InvalidOrExpiredToken)
            }
        }
    }
}

/// Split `<scheme> <credentials>` and return the credentials of a bearer header.
fn extract_bearer_token(header: Option<&str>) -> Result<&str, GateRejection> {
    let header = header
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(GateRejection::MissingCredential)?;

    let (scheme, credentials) = header
        .split_once(char::is_whitespace)
        .unwrap_or((header, ""));

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(GateRejection::UnsupportedScheme);
    }

    let token = credentials.trim();
    if token.is_empty() {
        return Err(GateRejection::InvalidOrExpiredToken);
    }

    Ok(token)
}
