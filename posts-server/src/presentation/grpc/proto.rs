pub(crate) mod pb {
    tonic::include_proto!("posts");
}

pub(crate) use pb::post_moderation_server::{PostModeration, PostModerationServer};
pub(crate) use pb::{DecideOnPostRequest, DecideOnPostResponse};
