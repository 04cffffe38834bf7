use async_trait::async_trait;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::AuthorPostCount;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostTitle;
use crate::domain::post::models::PostWithAuthor;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::user::models::UserId;

/// Port for post domain service operations.
#[async_trait]
pub trait PostServicePort: Send + Sync + 'static {
    /// Publish a new post.
    ///
    /// # Errors
    /// * `TitleAlreadyExists` - Another post uses the same title
    /// * `AuthorNotFound` - Author account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn create_post(&self, command: CreatePostCommand) -> Result<PostWithAuthor, PostError>;

    /// Retrieve a post and its author.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_post(&self, id: &PostId) -> Result<PostWithAuthor, PostError>;

    /// Retrieve every post, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, PostError>;

    /// Count posts per author. Authors without posts are omitted.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn count_posts_by_author(&self) -> Result<Vec<AuthorPostCount>, PostError>;

    /// Edit a post on behalf of `actor`.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `NotAuthor` - `actor` did not write the post
    /// * `TitleAlreadyExists` - New title collides with another post
    /// * `DatabaseError` - Database operation failed
    async fn update_post(
        &self,
        id: &PostId,
        actor: &UserId,
        command: UpdatePostCommand,
    ) -> Result<PostWithAuthor, PostError>;

    /// Delete a post on behalf of `actor`.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `NotAuthor` - `actor` did not write the post
    /// * `DatabaseError` - Database operation failed
    async fn delete_post(&self, id: &PostId, actor: &UserId) -> Result<(), PostError>;
}

/// Persistence operations for posts.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    /// Persist a new post.
    ///
    /// # Errors
    /// * `TitleAlreadyExists` - Unique title constraint violated
    /// * `AuthorNotFound` - Foreign key to users violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, post: Post) -> Result<Post, PostError>;

    /// Retrieve a post joined with its author (None if not found).
    async fn find_by_id(&self, id: &PostId) -> Result<Option<PostWithAuthor>, PostError>;

    /// Retrieve a post by exact title (None if not found).
    async fn find_by_title(&self, title: &PostTitle) -> Result<Option<Post>, PostError>;

    /// Retrieve all posts joined with their authors.
    async fn list_all(&self) -> Result<Vec<PostWithAuthor>, PostError>;

    /// Group posts by author and count them.
    async fn count_by_author(&self) -> Result<Vec<AuthorPostCount>, PostError>;

    /// Write the title, content and update time of an existing post.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `TitleAlreadyExists` - Unique title constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, post: Post) -> Result<Post, PostError>;

    /// Remove a post.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &PostId) -> Result<(), PostError>;
}
