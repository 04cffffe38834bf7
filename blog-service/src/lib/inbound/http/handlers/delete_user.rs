use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::middleware::AuthContext;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Delete the caller's own account along with its posts.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;

    if user_id != caller.user_id {
        tracing::warn!(target_user = %user_id, caller = %caller.user_id, "Rejected deletion of another account");
        return Err(ApiError::Forbidden(
            "You may only delete your own account".to_string(),
        ));
    }

    state.user_service.delete_user(&user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
