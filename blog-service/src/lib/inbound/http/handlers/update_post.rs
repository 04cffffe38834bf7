use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::PostContent;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostTitle;
use crate::domain::post::models::UpdatePostCommand;
use crate::inbound::http::middleware::AuthContext;
use crate::inbound::http::router::AppState;

/// HTTP request body for editing a post (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePostRequest {
    fn try_into_command(self) -> Result<UpdatePostCommand, PostError> {
        Ok(UpdatePostCommand {
            title: self.title.map(PostTitle::new).transpose()?,
            content: self.content.map(PostContent::new).transpose()?,
        })
    }
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<ApiSuccess<PostData>, ApiError> {
    let post_id = PostId::from_string(&id).map_err(PostError::from)?;
    let command = req.try_into_command()?;

    state
        .post_service
        .update_post(&post_id, &caller.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::OK, post.into()))
}
