use async_trait::async_trait;

use super::error::ClientError;

#[async_trait]
pub(crate) trait MediaClient: Send + Sync {
    async fn save_media(&self, image_base64: &str) -> Result<i64, ClientError>;
    async fn get_media(&self, media_id: i64) -> Result<String, ClientError>;
}
