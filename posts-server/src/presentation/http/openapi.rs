use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::moderation::{DecisionDto, ModerationReportDto};
use crate::presentation::http::handlers::posts::{
    CommentDto, CommentViewDto, CreateCommentDto, CreatePostDto, PostDto, PostViewDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::users_posts,
        crate::presentation::http::handlers::posts::all_posts,
        crate::presentation::http::handlers::posts::feed,
        crate::presentation::http::handlers::posts::search_by_tag,
        crate::presentation::http::handlers::posts::like,
        crate::presentation::http::handlers::posts::unlike,
        crate::presentation::http::handlers::posts::dislike,
        crate::presentation::http::handlers::posts::undislike,
        crate::presentation::http::handlers::posts::post_comment,
        crate::presentation::http::handlers::moderation::report_post,
        crate::presentation::http::handlers::moderation::flagged_content,
        crate::presentation::http::handlers::moderation::decide
    ),
    components(
        schemas(
            CreatePostDto,
            CreateCommentDto,
            PostDto,
            PostViewDto,
            CommentViewDto,
            CommentDto,
            DecisionDto,
            ModerationReportDto
        )
    ),
    tags(
        (name = "posts", description = "Post creation, feeds and tag search"),
        (name = "engagement", description = "Likes, dislikes and comments"),
        (name = "moderation", description = "Reporting and moderation decisions")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
