use tonic::{Request, Response, Status};
use tracing::info;

use crate::presentation::AppState;

use super::interceptors::authenticate_admin;
use super::proto::{
    DecideOnPostRequest, DecideOnPostResponse, PostModeration, PostModerationServer,
};
use super::status::map_domain_error;

#[derive(Clone)]
pub(crate) struct GrpcPostModerationService {
    state: AppState,
}

impl GrpcPostModerationService {
    pub(crate) fn new(state: AppState) -> Self {
        Self { state }
    }

    pub(crate) fn into_server(self) -> PostModerationServer<Self> {
        PostModerationServer::new(self)
    }
}

#[tonic::async_trait]
impl PostModeration for GrpcPostModerationService {
    async fn decide_on_post(
        &self,
        request: Request<DecideOnPostRequest>,
    ) -> Result<Response<DecideOnPostResponse>, Status> {
        let auth = authenticate_admin(self.state.jwt.as_ref(), request.metadata())?;

        let input = request.into_inner();
        let post_id = i64::try_from(input.post)
            .map_err(|_| Status::invalid_argument("post id out of range"))?;

        self.state
            .post_service
            .decide(post_id, input.delete)
            .await
            .map_err(map_domain_error)?;

        info!(post_id, delete = input.delete, moderator = %auth.email, "moderation decision applied");
        Ok(Response::new(DecideOnPostResponse { success: true }))
    }
}
