use std::sync::Arc;

use tracing::{debug, warn};

use super::materializer::PostViewMaterializer;
use super::tags::{is_mention_name, mentions};
use crate::clients::identity_client::IdentityClient;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::identity::normalize_email;
use crate::domain::post::Post;
use crate::domain::view::PostView;

pub(crate) struct FeedOrchestrator {
    posts: Arc<dyn PostRepository>,
    identity: Arc<dyn IdentityClient>,
    materializer: PostViewMaterializer,
}

impl FeedOrchestrator {
    pub(crate) fn new(
        posts: Arc<dyn PostRepository>,
        identity: Arc<dyn IdentityClient>,
        materializer: PostViewMaterializer,
    ) -> Self {
        Self {
            posts,
            identity,
            materializer,
        }
    }

    pub(crate) async fn users_posts(
        &self,
        subject: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.list_by_author(subject).await?;
        self.materialize_all(&posts, viewer).await
    }

    pub(crate) async fn feed(&self, viewer: &str) -> Result<Vec<PostView>, DomainError> {
        let following = self.identity.following(viewer).await.map_err(|err| {
            warn!(viewer, error = %err, "failed to load following list");
            DomainError::from(err)
        })?;

        let mut views = Vec::new();
        for followed in &following {
            let followed = match normalize_email("user", followed) {
                Ok(email) => email,
                Err(err) => {
                    warn!(viewer, %followed, error = %err, "skipping malformed followed identity");
                    continue;
                }
            };
            views.extend(self.users_posts(&followed, Some(viewer)).await?);
        }
        sort_newest_first(&mut views);

        debug!(viewer, followed = following.len(), posts = views.len(), "feed assembled");
        Ok(views)
    }

    pub(crate) async fn search_by_tag(
        &self,
        tag: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<PostView>, DomainError> {
        let tag = tag.trim();
        let tag = tag.strip_prefix('@').unwrap_or(tag);
        if !is_mention_name(tag) {
            return Err(DomainError::Validation {
                field: "tag",
                message: "must be letters, digits, '.' or '_'",
            });
        }

        match self.identity.is_taggable(tag).await {
            Ok(true) => {}
            Ok(false) => return Ok(Vec::new()),
            Err(err) => {
                warn!(tag, error = %err, "taggable check failed, returning no results");
                return Ok(Vec::new());
            }
        }

        let posts: Vec<Post> = self
            .posts
            .search_by_mention(tag)
            .await?
            .into_iter()
            .filter(|post| mentions(&post.description, tag))
            .collect();

        let mut views = self.materialize_all(&posts, viewer).await?;
        sort_newest_first(&mut views);
        Ok(views)
    }

    async fn materialize_all(
        &self,
        posts: &[Post],
        viewer: Option<&str>,
    ) -> Result<Vec<PostView>, DomainError> {
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.materializer.materialize(post, viewer).await?);
        }
        Ok(views)
    }
}

fn sort_newest_first(views: &mut [PostView]) {
    views.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
