use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthorData;
use crate::domain::post::models::AuthorPostCount;
use crate::inbound::http::router::AppState;

/// Number of posts per author, busiest authors first.
pub async fn count_posts_by_user(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<PostCountData>>, ApiError> {
    let counts = state.post_service.count_posts_by_author().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        counts.iter().map(PostCountData::from).collect(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCountData {
    pub author: AuthorData,
    pub total_posts: i64,
}

impl From<&AuthorPostCount> for PostCountData {
    fn from(count: &AuthorPostCount) -> Self {
        Self {
            author: (&count.author).into(),
            total_posts: count.total_posts,
        }
    }
}
