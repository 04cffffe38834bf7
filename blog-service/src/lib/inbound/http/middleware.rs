use auth::GateOutcome;
use auth::GateRejection;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiResponseBody;
use crate::inbound::http::router::AppState;

/// Identity of the caller, inserted into request extensions by [`require_bearer`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: UserId,
    pub username: String,
    pub claims: auth::Claims,
}

/// Run the bearer gate before the wrapped handler.
///
/// A rejected request is answered with 403 and never reaches the handler.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let header = match req.headers().get(header::AUTHORIZATION) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| {
            tracing::warn!("Authorization header is not valid UTF-8");
            reject(GateRejection::UnsupportedScheme)
        })?),
    };

    let claims = match state.gate.authorize(header) {
        GateOutcome::Verified(claims) => claims,
        GateOutcome::Rejected(reason) => {
            tracing::warn!(
                reason = %reason,
                method = %req.method(),
                uri = %req.uri(),
                "Bearer gate rejected request"
            );
            return Err(reject(reason));
        }
    };

    let user_id = claims
        .sub
        .as_deref()
        .and_then(|sub| UserId::from_string(sub).ok())
        .ok_or_else(|| {
            tracing::warn!("Token subject is missing or not a user id");
            reject(GateRejection::InvalidOrExpiredToken)
        })?;

    let username = claims.username().unwrap_or_default().to_string();

    req.extensions_mut().insert(AuthContext {
        user_id,
        username,
        claims,
    });

    Ok(next.run(req).await)
}

fn reject(reason: GateRejection) -> Response {
    let status = StatusCode::FORBIDDEN;
    (
        status,
        Json(ApiResponseBody::new_error(
            status,
            reason.public_message().to_string(),
        )),
    )
        .into_response()
}
