use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::Channel;
use tracing::debug;

use super::proto::media::media_service_client::MediaServiceClient;
use super::proto::media::{GetMediaRequest, MediaMessage, SaveMediaRequest};
use super::{RemoteEndpoint, with_deadline};
use crate::clients::error::ClientError;
use crate::clients::media_client::MediaClient;

const SERVICE: &str = "media-service";

#[derive(Debug, Clone)]
pub(crate) struct GrpcMediaClient {
    client: MediaServiceClient<Channel>,
    call_timeout: Duration,
}

impl GrpcMediaClient {
    pub(crate) fn new(endpoint: &RemoteEndpoint) -> Result<Self, ClientError> {
        let client = MediaServiceClient::new(endpoint.lazy_channel()?)
            .max_decoding_message_size(endpoint.max_message_size_bytes)
            .max_encoding_message_size(endpoint.max_message_size_bytes);

        Ok(Self {
            client,
            call_timeout: endpoint.call_timeout,
        })
    }

    fn request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        request.set_timeout(self.call_timeout);
        request
    }
}

#[async_trait]
impl MediaClient for GrpcMediaClient {
    async fn save_media(&self, image_base64: &str) -> Result<i64, ClientError> {
        let mut client = self.client.clone();
        let request = self.request(SaveMediaRequest {
            image: Some(MediaMessage {
                image_base64: image_base64.to_string(),
            }),
        });

        let response = with_deadline(SERVICE, self.call_timeout, async move {
            Ok(client.save_media(request).await?.into_inner())
        })
        .await?;

        debug!(media_id = response.id, "media saved");
        i64::try_from(response.id)
            .map_err(|_| ClientError::InvalidResponse(format!("media id {} out of range", response.id)))
    }

    async fn get_media(&self, media_id: i64) -> Result<String, ClientError> {
        let id = u64::try_from(media_id)
            .map_err(|_| ClientError::InvalidResponse(format!("invalid media id {media_id}")))?;
        let mut client = self.client.clone();
        let request = self.request(GetMediaRequest { id });

        let response = with_deadline(SERVICE, self.call_timeout, async move {
            Ok(client.get_media(request).await?.into_inner())
        })
        .await?;

        response
            .image
            .map(|image| image.image_base64)
            .ok_or_else(|| ClientError::InvalidResponse(format!("media {media_id} has no image")))
    }
}
