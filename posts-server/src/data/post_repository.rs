use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) description: String,
    pub(crate) author_email: String,
    pub(crate) created_at: i64,
    pub(crate) media_id: i64,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Post>, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn update_post(&self, post: &Post) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_by_author(&self, author_email: &str) -> Result<Vec<Post>, DomainError>;
    async fn list_flagged(&self) -> Result<Vec<Post>, DomainError>;
    /// Posts whose description contains `@tag` anywhere.
    async fn search_by_mention(&self, tag: &str) -> Result<Vec<Post>, DomainError>;
}
