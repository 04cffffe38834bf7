use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::post::errors::PostContentError;
use crate::domain::post::errors::PostIdError;
use crate::domain::post::errors::PostTitleError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Post unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(pub Uuid);

impl PostId {
    /// Generate a new random post ID.
    ///
    /// # Returns
    /// PostId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a post ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PostIdError> {
        Uuid::parse_str(s)
            .map(PostId)
            .map_err(|e| PostIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Post title value object (3-200 characters, surrounding whitespace trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 200;

    pub fn new(title: String) -> Result<Self, PostTitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();

        if length < Self::MIN_LENGTH {
            return Err(PostTitleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }

        if length > Self::MAX_LENGTH {
            return Err(PostTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Post body value object (at least 10 non-whitespace-padded characters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    const MIN_LENGTH: usize = 10;

    pub fn new(content: String) -> Result<Self, PostContentError> {
        let length = content.trim().chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PostContentError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }

        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Blog post entity. Every post belongs to exactly one user.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub content: PostContent,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a post's author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

/// Post joined with its author, as returned by read operations.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: AuthorSummary,
}

/// Number of posts written by one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorPostCount {
    pub author: AuthorSummary,
    pub total_posts: i64,
}

/// Command to publish a new post
#[derive(Debug)]
pub struct CreatePostCommand {
    pub title: PostTitle,
    pub content: PostContent,
    pub author_id: UserId,
}

/// Command to edit an existing post. Only provided fields change.
#[derive(Debug, Default)]
pub struct UpdatePostCommand {
    pub title: Option<PostTitle>,
    pub content: Option<PostContent>,
}
