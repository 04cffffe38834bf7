use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::AuthorPostCount;
use crate::domain::post::models::AuthorSummary;
use crate::domain::post::models::CreatePostCommand;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostWithAuthor;
use crate::domain::post::models::UpdatePostCommand;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::ports::PostServicePort;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for post operations.
///
/// Reads users through their repository to resolve authors.
pub struct PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    posts: Arc<PR>,
    users: Arc<UR>,
}

impl<PR, UR> PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    pub fn new(posts: Arc<PR>, users: Arc<UR>) -> Self {
        Self { posts, users }
    }

    async fn authored_post(&self, id: &PostId, actor: &UserId) -> Result<PostWithAuthor, PostError> {
        let found = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))?;

        if found.post.author_id != *actor {
            tracing::warn!(
                post_id = %id,
                actor = %actor,
                author = %found.post.author_id,
                "Rejected modification by non-author"
            );
            return Err(PostError::NotAuthor(id.to_string()));
        }

        Ok(found)
    }
}

#[async_trait]
impl<PR, UR> PostServicePort for PostService<PR, UR>
where
    PR: PostRepository,
    UR: UserRepository,
{
    async fn create_post(&self, command: CreatePostCommand) -> Result<PostWithAuthor, PostError> {
        if self.posts.find_by_title(&command.title).await?.is_some() {
            return Err(PostError::TitleAlreadyExists(
                command.title.as_str().to_string(),
            ));
        }

        let author = self
            .users
            .find_by_id(&command.author_id)
            .await?
            .ok_or_else(|| PostError::AuthorNotFound(command.author_id.to_string()))?;

        let now = Utc::now();
        let post = Post {
            id: PostId::new(),
            title: command.title,
            content: command.content,
            author_id: author.id,
            created_at: now,
            updated_at: now,
        };

        let created = self.posts.create(post).await?;

        tracing::info!(post_id = %created.id, author_id = %created.author_id, "Post created");

        Ok(PostWithAuthor {
            post: created,
            author: AuthorSummary::from(&author),
        })
    }

    async fn get_post(&self, id: &PostId) -> Result<PostWithAuthor, PostError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }

    async fn list_posts(&self) -> Result<Vec<PostWithAuthor>, PostError> {
        self.posts.list_all().await
    }

    async fn count_posts_by_author(&self) -> Result<Vec<AuthorPostCount>, PostError> {
        self.posts.count_by_author().await
    }

    async fn update_post(
        &self,
        id: &PostId,
        actor: &UserId,
        command: UpdatePostCommand,
    ) -> Result<PostWithAuthor, PostError> {
        let PostWithAuthor { mut post, author } = self.authored_post(id, actor).await?;

        if let Some(new_title) = command.title {
            if new_title != post.title {
                if let Some(existing) = self.posts.find_by_title(&new_title).await? {
                    if existing.id != post.id {
                        return Err(PostError::TitleAlreadyExists(
                            new_title.as_str().to_string(),
                        ));
                    }
                }
            }
            post.title = new_title;
        }

        if let Some(new_content) = command.content {
            post.content = new_content;
        }

        post.updated_at = Utc::now();

        let updated = self.posts.update(post).await?;

        tracing::info!(post_id = %updated.id, "Post updated");

        Ok(PostWithAuthor {
            post: updated,
            author,
        })
    }

    async fn delete_post(&self, id: &PostId, actor: &UserId) -> Result<(), PostError> {
        self.authored_post(id, actor).await?;
        self.posts.delete(id).await?;

        tracing::info!(post_id = %id, "Post deleted");

        Ok(())
    }
}
