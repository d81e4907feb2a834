use std::sync::Arc;

use tracing::warn;

use super::tags::TagResolver;
use crate::clients::error::ClientError;
use crate::clients::identity_client::IdentityClient;
use crate::clients::media_client::MediaClient;
use crate::data::comment_repository::CommentRepository;
use crate::data::reaction_repository::ReactionRepository;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::view::{CommentView, PostView, format_display_date};

pub(crate) struct PostViewMaterializer {
    likes: Arc<dyn ReactionRepository>,
    dislikes: Arc<dyn ReactionRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaClient>,
    identity: Arc<dyn IdentityClient>,
    tags: TagResolver,
}

#[derive(Debug, Default, Clone, Copy)]
struct ViewerFlags {
    liked: bool,
    disliked: bool,
    favorited: bool,
}

impl PostViewMaterializer {
    pub(crate) fn new(
        likes: Arc<dyn ReactionRepository>,
        dislikes: Arc<dyn ReactionRepository>,
        comments: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaClient>,
        identity: Arc<dyn IdentityClient>,
        tags: TagResolver,
    ) -> Self {
        Self {
            likes,
            dislikes,
            comments,
            media,
            identity,
            tags,
        }
    }

    pub(crate) async fn materialize(
        &self,
        post: &Post,
        viewer: Option<&str>,
    ) -> Result<PostView, DomainError> {
        let description = self.tags.resolve_tags(&post.description).await;
        let date = format_display_date(post.created_at);

        let image = self
            .media
            .get_media(post.media_id)
            .await
            .map_err(|err| remote_failure("fetch image", post.id, err))?;

        let username = self
            .identity
            .display_name(&post.author_email)
            .await
            .map_err(|err| remote_failure("resolve author name", post.id, err))?;

        let flags = match viewer {
            Some(viewer) if !viewer.is_empty() => self.viewer_flags(post.id, viewer).await?,
            _ => ViewerFlags::default(),
        };

        let likes = self.likes.count_for_post(post.id).await?;
        let dislikes = self.dislikes.count_for_post(post.id).await?;
        let comments = self.comment_views(post.id).await?;

        Ok(PostView {
            id: post.id,
            description,
            date,
            timestamp: post.created_at,
            image,
            username,
            liked: flags.liked,
            disliked: flags.disliked,
            favorited: flags.favorited,
            likes,
            dislikes,
            comments,
        })
    }

    async fn viewer_flags(&self, post_id: i64, viewer: &str) -> Result<ViewerFlags, DomainError> {
        let liked = self.likes.find(viewer, post_id).await?.is_some();
        let disliked = self.dislikes.find(viewer, post_id).await?.is_some();
        let favorited = self
            .identity
            .is_post_favorited(viewer, post_id)
            .await
            .map_err(|err| remote_failure("check favorites", post_id, err))?;

        Ok(ViewerFlags {
            liked,
            disliked,
            favorited,
        })
    }

    async fn comment_views(&self, post_id: i64) -> Result<Vec<CommentView>, DomainError> {
        let comments = self.comments.list_for_post(post_id).await?;

        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let username = self
                .identity
                .display_name(&comment.author_email)
                .await
                .map_err(|err| remote_failure("resolve commenter name", post_id, err))?;
            views.push(CommentView {
                text: self.tags.resolve_tags(&comment.text).await,
                date: format_display_date(comment.created_at),
                username,
            });
        }
        Ok(views)
    }
}

fn remote_failure(step: &'static str, post_id: i64, err: ClientError) -> DomainError {
    warn!(post_id, step, error = %err, "post materialization aborted");
    err.into()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::PostViewMaterializer;
    use crate::application::tags::{TagResolver, profile_link};
    use crate::application::test_support::{
        FakeCommentRepo, FakeIdentityClient, FakeMediaClient, FakeReactionRepo,
    };
    use crate::data::comment_repository::{CommentRepository, NewComment};
    use crate::data::reaction_repository::ReactionRepository;
    use crate::domain::engagement::ReactionKind;
    use crate::domain::error::DomainError;
    use crate::domain::post::Post;

    struct Parts {
        likes: FakeReactionRepo,
        dislikes: FakeReactionRepo,
        comments: FakeCommentRepo,
        media: FakeMediaClient,
        identity: FakeIdentityClient,
    }

    impl Parts {
        fn new() -> Self {
            Self {
                likes: FakeReactionRepo::new(ReactionKind::Like),
                dislikes: FakeReactionRepo::new(ReactionKind::Dislike),
                comments: FakeCommentRepo::new(),
                media: FakeMediaClient::new(),
                identity: FakeIdentityClient::new(),
            }
        }

        fn materializer(&self) -> PostViewMaterializer {
            let identity = Arc::new(self.identity.clone());
            PostViewMaterializer::new(
                Arc::new(self.likes.clone()),
                Arc::new(self.dislikes.clone()),
                Arc::new(self.comments.clone()),
                Arc::new(self.media.clone()),
                identity.clone(),
                TagResolver::new(identity),
            )
        }
    }

    fn sample_post() -> Post {
        Post {
            id: 7,
            description: "sunset with @alice".to_string(),
            author_email: "author@example.com".to_string(),
            created_at: 1_623_791_109,
            media_id: 70,
            marked_inappropriate: false,
        }
    }

    #[tokio::test]
    async fn anonymous_view_has_counts_and_no_flags() {
        let parts = Parts::new();
        parts.identity.set_taggable("alice");
        parts.likes.create("a@example.com", 7).await.expect("like");
        parts.likes.create("b@example.com", 7).await.expect("like");
        parts.dislikes.create("c@example.com", 7).await.expect("dislike");

        let view = parts
            .materializer()
            .materialize(&sample_post(), None)
            .await
            .expect("materialization must succeed");

        assert_eq!(view.id, 7);
        assert_eq!(view.description, format!("sunset with {}", profile_link("alice")));
        assert_eq!(view.date, "15.06.2021. 21:05");
        assert_eq!(view.timestamp, 1_623_791_109);
        assert_eq!(view.image, "image-70");
        assert_eq!(view.username, "author");
        assert_eq!((view.likes, view.dislikes), (2, 1));
        assert!(!view.liked && !view.disliked && !view.favorited);
        assert_eq!(parts.identity.favorite_checks(), 0);
    }

    #[tokio::test]
    async fn viewer_flags_reflect_relations() {
        let parts = Parts::new();
        parts.likes.create("viewer@example.com", 7).await.expect("like");
        parts.identity.add_favorite("viewer@example.com", 7);

        let view = parts
            .materializer()
            .materialize(&sample_post(), Some("viewer@example.com"))
            .await
            .expect("materialization must succeed");

        assert!(view.liked);
        assert!(!view.disliked);
        assert!(view.favorited);
    }

    #[tokio::test]
    async fn comments_are_resolved_individually() {
        let parts = Parts::new();
        parts.identity.set_taggable("bob");
        parts
            .comments
            .create_comment(NewComment {
                post_id: 7,
                author_email: "carol@example.com".to_string(),
                text: "nice one @bob".to_string(),
                created_at: 0,
            })
            .await
            .expect("comment");

        let view = parts
            .materializer()
            .materialize(&sample_post(), None)
            .await
            .expect("materialization must succeed");

        assert_eq!(view.comments.len(), 1);
        assert_eq!(view.comments[0].username, "carol");
        assert_eq!(view.comments[0].text, format!("nice one {}", profile_link("bob")));
        assert_eq!(view.comments[0].date, "01.01.1970. 00:00");
    }

    #[tokio::test]
    async fn media_failure_aborts_without_placeholder() {
        let parts = Parts::new();
        parts.media.fail_gets();

        let err = parts
            .materializer()
            .materialize(&sample_post(), None)
            .await
            .expect_err("media failure must abort");
        assert!(matches!(err, DomainError::Unavailable(_)));
    }

    #[tokio::test]
    async fn favorites_failure_aborts_as_internal() {
        let parts = Parts::new();
        parts.identity.fail_favorites();

        let err = parts
            .materializer()
            .materialize(&sample_post(), Some("viewer@example.com"))
            .await
            .expect_err("favorites failure must abort");
        assert!(matches!(err, DomainError::Unexpected(_)));
    }

    #[tokio::test]
    async fn name_failure_aborts_as_internal() {
        let parts = Parts::new();
        parts.identity.fail_names();

        let err = parts
            .materializer()
            .materialize(&sample_post(), None)
            .await
            .expect_err("name failure must abort");
        assert!(matches!(err, DomainError::Unexpected(_)));
    }
}
