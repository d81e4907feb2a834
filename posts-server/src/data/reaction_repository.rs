use async_trait::async_trait;

use crate::domain::engagement::{Reaction, ReactionKind};
use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait ReactionRepository: Send + Sync {
    fn kind(&self) -> ReactionKind;
    async fn create(&self, viewer_email: &str, post_id: i64) -> Result<Reaction, DomainError>;
    async fn find(&self, viewer_email: &str, post_id: i64)
    -> Result<Option<Reaction>, DomainError>;
    async fn delete(&self, viewer_email: &str, post_id: i64) -> Result<bool, DomainError>;
    async fn count_for_post(&self, post_id: i64) -> Result<u64, DomainError>;
}
