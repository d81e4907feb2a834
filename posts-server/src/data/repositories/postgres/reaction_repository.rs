use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::data::reaction_repository::ReactionRepository;
use crate::domain::engagement::{Reaction, ReactionKind};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresReactionRepository {
    pool: PgPool,
    kind: ReactionKind,
}

impl PostgresReactionRepository {
    pub(crate) fn likes(pool: PgPool) -> Self {
        Self {
            pool,
            kind: ReactionKind::Like,
        }
    }

    pub(crate) fn dislikes(pool: PgPool) -> Self {
        Self {
            pool,
            kind: ReactionKind::Dislike,
        }
    }

    fn table(&self) -> &'static str {
        match self.kind {
            ReactionKind::Like => "likes",
            ReactionKind::Dislike => "dislikes",
        }
    }
}

#[derive(FromRow)]
struct ReactionRow {
    id: i64,
    viewer_email: String,
    post_id: i64,
}

impl From<ReactionRow> for Reaction {
    fn from(row: ReactionRow) -> Self {
        Self {
            id: row.id,
            viewer_email: row.viewer_email,
            post_id: row.post_id,
        }
    }
}

#[async_trait]
impl ReactionRepository for PostgresReactionRepository {
    fn kind(&self) -> ReactionKind {
        self.kind
    }

    async fn create(&self, viewer_email: &str, post_id: i64) -> Result<Reaction, DomainError> {
        let row = sqlx::query_as::<_, ReactionRow>(&format!(
            r#"
            INSERT INTO {} (viewer_email, post_id)
            VALUES ($1, $2)
            RETURNING id, viewer_email, post_id
            "#,
            self.table()
        ))
        .bind(viewer_email)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_reaction_db_error(self.kind, post_id, err))?;

        Ok(row.into())
    }

    async fn find(
        &self,
        viewer_email: &str,
        post_id: i64,
    ) -> Result<Option<Reaction>, DomainError> {
        let row = sqlx::query_as::<_, ReactionRow>(&format!(
            r#"
            SELECT id, viewer_email, post_id
            FROM {}
            WHERE viewer_email = $1 AND post_id = $2
            "#,
            self.table()
        ))
        .bind(viewer_email)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_reaction_db_error(self.kind, post_id, err))?;

        Ok(row.map(Reaction::from))
    }

    async fn delete(&self, viewer_email: &str, post_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE viewer_email = $1 AND post_id = $2",
            self.table()
        ))
        .bind(viewer_email)
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(|err| map_reaction_db_error(self.kind, post_id, err))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_for_post(&self, post_id: i64) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE post_id = $1",
            self.table()
        ))
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_reaction_db_error(self.kind, post_id, err))?;

        Ok(count.max(0) as u64)
    }
}

fn map_reaction_db_error(kind: ReactionKind, post_id: i64, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => return DomainError::Conflict(kind.already_exists_message().to_string()),
            Some("23503") => return DomainError::post_not_found(post_id),
            _ => {}
        }
    }
    DomainError::Unexpected(err.to_string())
}
