use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::PostId;
use crate::inbound::http::middleware::AuthContext;
use crate::inbound::http::router::AppState;

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let post_id = PostId::from_string(&id).map_err(PostError::from)?;

    state.post_service.delete_post(&post_id, &caller.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
