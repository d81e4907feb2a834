use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::Channel;

use super::proto::users::user_service_client::UserServiceClient;
use super::proto::users::{
    CheckFavoritesRequest, CheckTaggableRequest, GetFollowingUsersRequest, GetUsernameRequest,
};
use super::{RemoteEndpoint, with_deadline};
use crate::clients::error::ClientError;
use crate::clients::identity_client::IdentityClient;

const SERVICE: &str = "user-service";

#[derive(Debug, Clone)]
pub(crate) struct GrpcIdentityClient {
    client: UserServiceClient<Channel>,
    call_timeout: Duration,
}

impl GrpcIdentityClient {
    pub(crate) fn new(endpoint: &RemoteEndpoint) -> Result<Self, ClientError> {
        let client = UserServiceClient::new(endpoint.lazy_channel()?)
            .max_decoding_message_size(endpoint.max_message_size_bytes);

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
impl IdentityClient for GrpcIdentityClient {
    async fn display_name(&self, email: &str) -> Result<String, ClientError> {
        let mut client = self.client.clone();
        let request = self.request(GetUsernameRequest {
            email: email.to_string(),
        });

        with_deadline(SERVICE, self.call_timeout, async move {
            Ok(client.get_username(request).await?.into_inner().username)
        })
        .await
    }

    async fn is_post_favorited(
        &self,
        viewer_email: &str,
        post_id: i64,
    ) -> Result<bool, ClientError> {
        let post_id = u64::try_from(post_id)
            .map_err(|_| ClientError::InvalidResponse(format!("invalid post id {post_id}")))?;
        let mut client = self.client.clone();
        let request = self.request(CheckFavoritesRequest {
            email: viewer_email.to_string(),
            post_id,
        });

        with_deadline(SERVICE, self.call_timeout, async move {
            Ok(client
                .check_if_post_is_in_favorites(request)
                .await?
                .into_inner()
                .in_favorites)
        })
        .await
    }

    async fn is_taggable(&self, name: &str) -> Result<bool, ClientError> {
        let mut client = self.client.clone();
        let request = self.request(CheckTaggableRequest {
            username: name.to_string(),
        });

        with_deadline(SERVICE, self.call_timeout, async move {
            Ok(client
                .check_if_user_is_taggable(request)
                .await?
                .into_inner()
                .taggable)
        })
        .await
    }

    async fn following(&self, email: &str) -> Result<Vec<String>, ClientError> {
        let mut client = self.client.clone();
        let request = self.request(GetFollowingUsersRequest {
            user_email: email.to_string(),
        });

        with_deadline(SERVICE, self.call_timeout, async move {
            let mut stream = client.get_following_users(request).await?.into_inner();
            let mut users = Vec::new();
            while let Some(item) = stream.message().await? {
                users.push(item.user);
            }
            Ok(users)
        })
        .await
    }
}
