use thiserror::Error;

use crate::user::errors::UserError;

/// Error for PostId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for PostTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostTitleError {
    #[error("Title too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for PostContent validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostContentError {
    #[error("Content too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Top-level error for all post-related operations
#[derive(Debug, Clone, Error)]
pub enum PostError {
    #[error("Invalid post ID: {0}")]
    InvalidPostId(#[from] PostIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] PostTitleError),

    #[error("Invalid content: {0}")]
    InvalidContent(#[from] PostContentError),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("A post with this title already exists: {0}")]
    TitleAlreadyExists(String),

    #[error("Author not found: {0}")]
    AuthorNotFound(String),

    #[error("Only the author may modify post {0}")]
    NotAuthor(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<UserError> for PostError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => PostError::AuthorNotFound(id),
            UserError::DatabaseError(msg) => PostError::DatabaseError(msg),
            other => PostError::Unknown(other.to_string()),
        }
    }
}
