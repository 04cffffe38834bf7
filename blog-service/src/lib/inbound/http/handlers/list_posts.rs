use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::inbound::http::router::AppState;

pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<PostData>>, ApiError> {
    let posts = state.post_service.list_posts().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        posts.iter().map(PostData::from).collect(),
    ))
}
