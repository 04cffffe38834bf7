use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::post::errors::PostError;
use crate::domain::post::models::AuthorPostCount;
use crate::domain::post::models::AuthorSummary;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostContent;
use crate::domain::post::models::PostId;
use crate::domain::post::models::PostTitle;
use crate::domain::post::models::PostWithAuthor;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::UserId;

const SELECT_WITH_AUTHOR: &str = r#"
    SELECT p.id, p.title, p.content, p.author_id, p.created_at, p.updated_at,
           u.username AS author_username, u.email AS author_email
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_post(row: &PgRow) -> Result<Post, PostError> {
        Ok(Post {
            id: PostId(row.try_get("id").map_err(db_error)?),
            title: PostTitle::new(row.try_get("title").map_err(db_error)?)?,
            content: PostContent::new(row.try_get("content").map_err(db_error)?)?,
            author_id: UserId(row.try_get("author_id").map_err(db_error)?),
            created_at: row.try_get("created_at").map_err(db_error)?,
            updated_at: row.try_get("updated_at").map_err(db_error)?,
        })
    }

    fn row_to_post_with_author(row: &PgRow) -> Result<PostWithAuthor, PostError> {
        let post = Self::row_to_post(row)?;
        let author = AuthorSummary {
            id: post.author_id,
            username: row.try_get("author_username").map_err(db_error)?,
            email: row.try_get("author_email").map_err(db_error)?,
        };

        Ok(PostWithAuthor { post, author })
    }

    fn map_write_error(e: sqlx::Error, post: &Post) -> PostError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() && db_err.constraint() == Some("posts_title_key") {
                return PostError::TitleAlreadyExists(post.title.as_str().to_string());
            }
            if db_err.is_foreign_key_violation()
                && db_err.constraint() == Some("posts_author_id_fkey")
            {
                return PostError::AuthorNotFound(post.author_id.to_string());
            }
        }
        db_error(e)
    }
}

fn db_error(e: sqlx::Error) -> PostError {
    PostError::DatabaseError(e.to_string())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, PostError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id.0)
        .bind(post.title.as_str())
        .bind(post.content.as_str())
        .bind(post.author_id.0)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &post))?;

        Ok(post)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<PostWithAuthor>, PostError> {
        let query = format!("{SELECT_WITH_AUTHOR} WHERE p.id = $1");

        let row = sqlx::query(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.as_ref().map(Self::row_to_post_with_author).transpose()
    }

    async fn find_by_title(&self, title: &PostTitle) -> Result<Option<Post>, PostError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, content, author_id, created_at, updated_at
            FROM posts
            WHERE title = $1
            "#,
        )
        .bind(title.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref().map(Self::row_to_post).transpose()
    }

    async fn list_all(&self) -> Result<Vec<PostWithAuthor>, PostError> {
        let query = format!("{SELECT_WITH_AUTHOR} ORDER BY p.created_at DESC");

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.iter().map(Self::row_to_post_with_author).collect()
    }

    async fn count_by_author(&self) -> Result<Vec<AuthorPostCount>, PostError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.email, COUNT(p.id) AS total_posts
            FROM users u
            JOIN posts p ON p.author_id = u.id
            GROUP BY u.id, u.username, u.email
            ORDER BY total_posts DESC, u.username ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter()
            .map(|r| {
                Ok(AuthorPostCount {
                    author: AuthorSummary {
                        id: UserId(r.try_get("id").map_err(db_error)?),
                        username: r.try_get("username").map_err(db_error)?,
                        email: r.try_get("email").map_err(db_error)?,
                    },
                    total_posts: r.try_get("total_posts").map_err(db_error)?,
                })
            })
            .collect()
    }

    async fn update(&self, post: Post) -> Result<Post, PostError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, content = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(post.id.0)
        .bind(post.title.as_str())
        .bind(post.content.as_str())
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &post))?;

        if result.rows_affected() == 0 {
            return Err(PostError::NotFound(post.id.to_string()));
        }

        Ok(post)
    }

    async fn delete(&self, id: &PostId) -> Result<(), PostError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(PostError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
