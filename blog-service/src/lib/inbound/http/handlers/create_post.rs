use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::PostContent;
use crate::domain::post::models::PostTitle;
use crate::inbound::http::middleware::AuthContext;
use crate::inbound::http::router::AppState;

/// Publish a post authored by the caller.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    Json(body): Json<CreatePostRequest>,
) -> Result<ApiSuccess<PostData>, ApiError> {
    let command = CreatePostCommand {
        title: PostTitle::new(body.title).map_err(PostError::from)?,
        content: PostContent::new(body.content).map_err(PostError::from)?,
        author_id: caller.user_id,
    };

    state
        .post_service
        .create_post(command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::CREATED, post.into()))
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    title: String,
    content: String,
}
