use std::sync::Arc;

use auth::AuthenticationError;
use auth::AuthenticationResult;
use auth::Authenticator;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::Username;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Exchange username and password for an access token.
///
/// Unknown usernames and wrong passwords produce the same 401 response.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let user = match Username::new(body.username) {
        Ok(username) => match state.user_service.get_user_by_username(&username).await {
            Ok(user) => Some(user),
            Err(UserError::NotFoundByUsername(_)) => None,
            Err(e) => return Err(ApiError::from(e)),
        },
        Err(_) => None,
    };

    let authenticator = Arc::clone(&state.authenticator);
    let outcome = tokio::task::spawn_blocking(move || verify(&authenticator, user, &body.password))
        .await
        .map_err(ApiError::internal)?;

    match outcome {
        Ok((user, result)) => {
            tracing::info!(user_id = %user.id, "User logged in");
            Ok(ApiSuccess::new(StatusCode::OK, result.into()))
        }
        Err(AuthenticationError::InvalidCredentials) => {
            tracing::warn!("Login rejected");
            Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
        Err(e) => Err(ApiError::internal(e)),
    }
}

fn verify(
    authenticator: &Authenticator,
    user: Option<User>,
    password: &str,
) -> Result<(User, AuthenticationResult), AuthenticationError> {
    let Some(user) = user else {
        return Err(authenticator.reject_unknown_account(password));
    };

    let claims = auth::Claims::for_user(user.id, user.username.as_str());
    let result = authenticator.authenticate(password, &user.password_hash, claims)?;

    Ok((user, result))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<AuthenticationResult> for LoginResponseData {
    fn from(result: AuthenticationResult) -> Self {
        Self {
            access_token: result.access_token,
            token_type: result.token_type,
            expires_in: result.expires_in,
        }
    }
}
