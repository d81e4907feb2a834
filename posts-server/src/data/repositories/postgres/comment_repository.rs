use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    author_email: String,
    text: String,
    created_at: i64,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            author_email: row.author_email,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (post_id, author_email, text, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, author_email, text, created_at
            "#,
        )
        .bind(input.post_id)
        .bind(&input.author_email)
        .bind(&input.text)
        .bind(input.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_comment_db_error(input.post_id, err))?;

        Ok(row.into())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_email, text, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| map_comment_db_error(post_id, err))?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}

fn map_comment_db_error(post_id: i64, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::post_not_found(post_id);
    }
    DomainError::Unexpected(err.to_string())
}
