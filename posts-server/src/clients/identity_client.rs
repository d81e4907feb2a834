use async_trait::async_trait;

use super::error::ClientError;

#[async_trait]
pub(crate) trait IdentityClient: Send + Sync {
    async fn display_name(&self, email: &str) -> Result<String, ClientError>;
    async fn is_post_favorited(&self, viewer_email: &str, post_id: i64)
    -> Result<bool, ClientError>;
    /// `name` is a mention without the leading `@`.
    async fn is_taggable(&self, name: &str) -> Result<bool, ClientError>;
    /// Drains the server stream of identities followed by `email`.
    async fn following(&self, email: &str) -> Result<Vec<String>, ClientError>;
}
