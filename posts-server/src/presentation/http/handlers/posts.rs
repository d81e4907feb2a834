use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::comment::{Comment, PostCommentRequest};
use crate::domain::post::{CreatePostRequest, Post};
use crate::domain::view::{CommentView, PostView};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::{AuthenticatedUser, OptionalViewer};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(max = 2200))]
    #[serde(default)]
    pub(crate) description: String,
    /// Base64-encoded image payload.
    #[validate(length(min = 1))]
    pub(crate) image: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateCommentDto {
    #[validate(length(min = 1, max = 1000))]
    pub(crate) text: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub(crate) struct UsersPostsQuery {
    /// Author e-mail.
    #[validate(email)]
    pub(crate) user: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub(crate) struct SearchQuery {
    /// Tag with or without the leading `@`.
    #[validate(length(min = 1, max = 64))]
    pub(crate) tag: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) description: String,
    pub(crate) author_email: String,
    pub(crate) created_at: i64,
    pub(crate) media_id: i64,
    pub(crate) marked_inappropriate: bool,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            description: post.description,
            author_email: post.author_email,
            created_at: post.created_at,
            media_id: post.media_id,
            marked_inappropriate: post.marked_inappropriate,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentViewDto {
    pub(crate) text: String,
    pub(crate) date: String,
    pub(crate) username: String,
}

impl From<CommentView> for CommentViewDto {
    fn from(view: CommentView) -> Self {
        Self {
            text: view.text,
            date: view.date,
            username: view.username,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostViewDto {
    pub(crate) id: i64,
    /// Description with taggable mentions rendered as profile links.
    pub(crate) description: String,
    pub(crate) date: String,
    pub(crate) timestamp: i64,
    pub(crate) image: String,
    pub(crate) username: String,
    pub(crate) liked: bool,
    pub(crate) disliked: bool,
    pub(crate) in_favorites: bool,
    pub(crate) likes: u64,
    pub(crate) dislikes: u64,
    pub(crate) comments: Vec<CommentViewDto>,
}

impl From<PostView> for PostViewDto {
    fn from(view: PostView) -> Self {
        Self {
            id: view.id,
            description: view.description,
            date: view.date,
            timestamp: view.timestamp,
            image: view.image,
            username: view.username,
            liked: view.liked,
            disliked: view.disliked,
            in_favorites: view.favorited,
            likes: view.likes,
            dislikes: view.dislikes,
            comments: view.comments.into_iter().map(CommentViewDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author_email: String,
    pub(crate) text: String,
    pub(crate) created_at: i64,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_email: comment.author_email,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

fn into_view_dtos(views: Vec<PostView>) -> Json<Vec<PostViewDto>> {
    Json(views.into_iter().map(PostViewDto::from).collect())
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error"),
        (status = 503, description = "Media service unavailable")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        description: dto.description,
        author_email: auth.email,
        image_base64: dto.image,
    };

    let post = state.post_service.create_post(req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(UsersPostsQuery),
    responses(
        (status = 200, description = "Posts of one author", body = [PostViewDto]),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid token"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn users_posts(
    State(state): State<AppState>,
    viewer: OptionalViewer,
    Query(query): Query<UsersPostsQuery>,
) -> AppResult<Json<Vec<PostViewDto>>> {
    query.validate()?;
    let views = state
        .post_service
        .get_users_posts(&query.user, viewer.as_deref())
        .await?;
    Ok(into_view_dtos(views))
}

#[utoipa::path(
    get,
    path = "/api/posts/all",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Every stored post", body = [PostDto]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn all_posts(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<PostDto>>> {
    let posts = state.post_service.get_all().await?;
    Ok(Json(posts.into_iter().map(PostDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/feed",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Posts of followed users, newest first", body = [PostViewDto]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error"),
        (status = 503, description = "Dependency unavailable")
    )
)]
pub(crate) async fn feed(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<PostViewDto>>> {
    let views = state.post_service.get_feed(&auth.email).await?;
    Ok(into_view_dtos(views))
}

#[utoipa::path(
    get,
    path = "/api/posts/search",
    tag = "posts",
    params(SearchQuery),
    responses(
        (status = 200, description = "Posts mentioning the tag, newest first", body = [PostViewDto]),
        (status = 400, description = "Malformed tag"),
        (status = 401, description = "Invalid token"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn search_by_tag(
    State(state): State<AppState>,
    viewer: OptionalViewer,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<PostViewDto>>> {
    query.validate()?;
    let views = state
        .post_service
        .search_by_tag(&query.tag, viewer.as_deref())
        .await?;
    Ok(into_view_dtos(views))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    tag = "engagement",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post liked"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 409, description = "Already liked or disliked")
    )
)]
pub(crate) async fn like(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.post_service.like(&auth.email, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/like",
    tag = "engagement",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Like removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or like not found")
    )
)]
pub(crate) async fn unlike(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.post_service.unlike(&auth.email, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/dislike",
    tag = "engagement",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post disliked"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 409, description = "Already liked or disliked")
    )
)]
pub(crate) async fn dislike(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.post_service.dislike(&auth.email, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/dislike",
    tag = "engagement",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Dislike removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or dislike not found")
    )
)]
pub(crate) async fn undislike(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.post_service.undislike(&auth.email, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    tag = "engagement",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment posted", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn post_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<CreateCommentDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    dto.validate()?;
    let req = PostCommentRequest {
        post_id: id,
        author_email: auth.email,
        text: dto.text,
    };

    let comment = state.post_service.post_comment(req).await?;
    Ok((StatusCode::CREATED, Json(CommentDto::from(comment))))
}
