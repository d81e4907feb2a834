use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::engagement::EngagementEnforcer;
use super::feed::FeedOrchestrator;
use super::materializer::PostViewMaterializer;
use super::tags::TagResolver;
use crate::clients::identity_client::IdentityClient;
use crate::clients::media_client::MediaClient;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostRepository};
use crate::data::reaction_repository::ReactionRepository;
use crate::domain::comment::{Comment, PostCommentRequest};
use crate::domain::engagement::ReactionKind;
use crate::domain::error::DomainError;
use crate::domain::identity::{normalize_email, normalize_viewer};
use crate::domain::post::{CreatePostRequest, Post, validate_post_id};
use crate::domain::view::{ModerationReport, PostView};

pub(crate) struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaClient>,
    engagement: EngagementEnforcer,
    feed: FeedOrchestrator,
}

impl PostService {
    pub(crate) fn new(
        posts: Arc<dyn PostRepository>,
        likes: Arc<dyn ReactionRepository>,
        dislikes: Arc<dyn ReactionRepository>,
        comments: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaClient>,
        identity: Arc<dyn IdentityClient>,
    ) -> Self {
        let materializer = PostViewMaterializer::new(
            likes.clone(),
            dislikes.clone(),
            comments.clone(),
            media.clone(),
            identity.clone(),
            TagResolver::new(identity.clone()),
        );

        Self {
            engagement: EngagementEnforcer::new(posts.clone(), likes, dislikes),
            feed: FeedOrchestrator::new(posts.clone(), identity, materializer),
            posts,
            comments,
            media,
        }
    }

    /// Stores the image first, then the post. A failed post write leaves the
    /// saved media orphaned.
    pub(crate) async fn create_post(&self, req: CreatePostRequest) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let media_id = self.media.save_media(&req.image_base64).await.map_err(|err| {
            warn!(author = %req.author_email, error = %err, "failed to save post image");
            DomainError::from(err)
        })?;

        let new_post = NewPost {
            description: req.description,
            author_email: req.author_email,
            created_at: Utc::now().timestamp(),
            media_id,
        };
        match self.posts.create_post(new_post).await {
            Ok(post) => {
                info!(post_id = post.id, media_id, "post created");
                Ok(post)
            }
            Err(err) => {
                warn!(media_id, error = %err, "post write failed after media was saved");
                Err(err)
            }
        }
    }

    pub(crate) async fn get_all(&self) -> Result<Vec<Post>, DomainError> {
        self.posts.list_all().await
    }

    pub(crate) async fn like(&self, viewer: &str, post_id: i64) -> Result<(), DomainError> {
        self.react(viewer, post_id, ReactionKind::Like).await
    }

    pub(crate) async fn dislike(&self, viewer: &str, post_id: i64) -> Result<(), DomainError> {
        self.react(viewer, post_id, ReactionKind::Dislike).await
    }

    pub(crate) async fn unlike(&self, viewer: &str, post_id: i64) -> Result<(), DomainError> {
        self.withdraw(viewer, post_id, ReactionKind::Like).await
    }

    pub(crate) async fn undislike(&self, viewer: &str, post_id: i64) -> Result<(), DomainError> {
        self.withdraw(viewer, post_id, ReactionKind::Dislike).await
    }

    async fn react(&self, viewer: &str, post_id: i64, kind: ReactionKind) -> Result<(), DomainError> {
        let viewer = normalize_email("viewer", viewer)?;
        validate_post_id(post_id)?;
        self.engagement.react(&viewer, post_id, kind).await
    }

    async fn withdraw(
        &self,
        viewer: &str,
        post_id: i64,
        kind: ReactionKind,
    ) -> Result<(), DomainError> {
        let viewer = normalize_email("viewer", viewer)?;
        validate_post_id(post_id)?;
        self.engagement.withdraw(&viewer, post_id, kind).await
    }

    pub(crate) async fn post_comment(&self, req: PostCommentRequest) -> Result<Comment, DomainError> {
        let req = req.validate()?;
        self.load_post(req.post_id).await?;

        self.comments
            .create_comment(NewComment {
                post_id: req.post_id,
                author_email: req.author_email,
                text: req.text,
                created_at: Utc::now().timestamp(),
            })
            .await
    }

    pub(crate) async fn report_inappropriate(&self, post_id: i64) -> Result<(), DomainError> {
        validate_post_id(post_id)?;
        let mut post = self.load_post(post_id).await?;
        if post.marked_inappropriate {
            return Ok(());
        }

        post.marked_inappropriate = true;
        self.posts
            .update_post(&post)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        info!(post_id, "post reported as inappropriate");
        Ok(())
    }

    pub(crate) async fn decide(&self, post_id: i64, delete: bool) -> Result<(), DomainError> {
        validate_post_id(post_id)?;
        let mut post = self.load_post(post_id).await?;

        if delete {
            if !self.posts.delete_post(post_id).await? {
                return Err(DomainError::post_not_found(post_id));
            }
            info!(post_id, "flagged post deleted");
        } else {
            post.marked_inappropriate = false;
            self.posts
                .update_post(&post)
                .await?
                .ok_or_else(|| DomainError::post_not_found(post_id))?;
            info!(post_id, "post flag cleared");
        }
        Ok(())
    }

    pub(crate) async fn get_users_posts(
        &self,
        subject: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<PostView>, DomainError> {
        let subject = normalize_email("user", subject)?;
        let viewer = normalize_viewer(viewer)?;
        self.feed.users_posts(&subject, viewer.as_deref()).await
    }

    pub(crate) async fn get_feed(&self, viewer: &str) -> Result<Vec<PostView>, DomainError> {
        let viewer = normalize_email("viewer", viewer)?;
        self.feed.feed(&viewer).await
    }

    pub(crate) async fn search_by_tag(
        &self,
        tag: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<PostView>, DomainError> {
        let viewer = normalize_viewer(viewer)?;
        self.feed.search_by_tag(tag, viewer.as_deref()).await
    }

    /// Flagged posts for moderators. An image that cannot be fetched is
    /// reported as empty rather than failing the listing.
    pub(crate) async fn get_flagged_content(&self) -> Result<Vec<ModerationReport>, DomainError> {
        let flagged = self.posts.list_flagged().await?;

        let mut reports = Vec::with_capacity(flagged.len());
        for post in flagged {
            let image = match self.media.get_media(post.media_id).await {
                Ok(image) => image,
                Err(err) => {
                    warn!(post_id = post.id, media_id = post.media_id, error = %err, "failed to fetch flagged post image");
                    String::new()
                }
            };
            reports.push(ModerationReport {
                post_id: post.id,
                description: post.description,
                author_email: post.author_email,
                image,
            });
        }
        Ok(reports)
    }

    async fn load_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }
}
