use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::data::post_repository::PostRepository;
use crate::data::reaction_repository::ReactionRepository;
use crate::domain::engagement::ReactionKind;
use crate::domain::error::DomainError;

const LOCK_STRIPES: usize = 64;

/// Serializes check-then-write sequences per (viewer, post) within this
/// process. The unique constraints on the reaction tables cover the rest.
pub(crate) struct PairLocks {
    stripes: Vec<Mutex<()>>,
}

impl PairLocks {
    pub(crate) fn new(stripes: usize) -> Self {
        Self {
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    pub(crate) async fn lock(&self, viewer_email: &str, post_id: i64) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        viewer_email.hash(&mut hasher);
        post_id.hash(&mut hasher);
        let stripe = (hasher.finish() % self.stripes.len() as u64) as usize;
        self.stripes[stripe].lock().await
    }
}

pub(crate) struct EngagementEnforcer {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn ReactionRepository>,
    dislikes: Arc<dyn ReactionRepository>,
    locks: PairLocks,
}

impl EngagementEnforcer {
    pub(crate) fn new(
        posts: Arc<dyn PostRepository>,
        likes: Arc<dyn ReactionRepository>,
        dislikes: Arc<dyn ReactionRepository>,
    ) -> Self {
        debug_assert_eq!(likes.kind(), ReactionKind::Like);
        debug_assert_eq!(dislikes.kind(), ReactionKind::Dislike);
        Self {
            posts,
            likes,
            dislikes,
            locks: PairLocks::new(LOCK_STRIPES),
        }
    }

    fn repo(&self, kind: ReactionKind) -> &dyn ReactionRepository {
        match kind {
            ReactionKind::Like => self.likes.as_ref(),
            ReactionKind::Dislike => self.dislikes.as_ref(),
        }
    }

    pub(crate) async fn react(
        &self,
        viewer_email: &str,
        post_id: i64,
        kind: ReactionKind,
    ) -> Result<(), DomainError> {
        let _guard = self.locks.lock(viewer_email, post_id).await;
        self.ensure_post_exists(post_id).await?;

        for existing in [kind, kind.opposite()] {
            if self.repo(existing).find(viewer_email, post_id).await?.is_some() {
                return Err(DomainError::Conflict(
                    existing.already_exists_message().to_string(),
                ));
            }
        }

        self.repo(kind).create(viewer_email, post_id).await?;
        debug!(post_id, viewer = viewer_email, kind = kind.as_str(), "reaction created");
        Ok(())
    }

    pub(crate) async fn withdraw(
        &self,
        viewer_email: &str,
        post_id: i64,
        kind: ReactionKind,
    ) -> Result<(), DomainError> {
        let _guard = self.locks.lock(viewer_email, post_id).await;
        self.ensure_post_exists(post_id).await?;

        let not_found = || DomainError::NotFound(format!("{} on post id: {post_id}", kind.as_str()));
        if self.repo(kind).find(viewer_email, post_id).await?.is_none() {
            return Err(not_found());
        }
        if !self.repo(kind).delete(viewer_email, post_id).await? {
            return Err(not_found());
        }

        debug!(post_id, viewer = viewer_email, kind = kind.as_str(), "reaction removed");
        Ok(())
    }

    async fn ensure_post_exists(&self, post_id: i64) -> Result<(), DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{EngagementEnforcer, PairLocks};
    use crate::application::test_support::{FakePostRepo, FakeReactionRepo};
    use crate::domain::engagement::ReactionKind;
    use crate::domain::error::DomainError;

    const VIEWER: &str = "viewer@example.com";

    fn enforcer() -> (EngagementEnforcer, FakeReactionRepo, FakeReactionRepo) {
        let posts = FakePostRepo::new();
        posts.insert(5, "author@example.com", "caption", 100);
        let likes = FakeReactionRepo::new(ReactionKind::Like);
        let dislikes = FakeReactionRepo::new(ReactionKind::Dislike);
        let enforcer = EngagementEnforcer::new(
            Arc::new(posts),
            Arc::new(likes.clone()),
            Arc::new(dislikes.clone()),
        );
        (enforcer, likes, dislikes)
    }

    #[tokio::test]
    async fn second_like_conflicts_and_keeps_one_row() {
        let (enforcer, likes, _) = enforcer();

        enforcer
            .react(VIEWER, 5, ReactionKind::Like)
            .await
            .expect("first like must succeed");
        let err = enforcer
            .react(VIEWER, 5, ReactionKind::Like)
            .await
            .expect_err("second like must fail");

        assert!(matches!(err, DomainError::Conflict(ref msg) if msg == "already liked"));
        assert_eq!(likes.rows_for(VIEWER, 5), 1);
    }

    #[tokio::test]
    async fn like_and_dislike_are_mutually_exclusive() {
        let (enforcer, likes, dislikes) = enforcer();

        enforcer
            .react(VIEWER, 5, ReactionKind::Dislike)
            .await
            .expect("dislike must succeed");
        let err = enforcer
            .react(VIEWER, 5, ReactionKind::Like)
            .await
            .expect_err("like after dislike must fail");

        assert!(matches!(err, DomainError::Conflict(ref msg) if msg == "already disliked"));
        assert_eq!(likes.rows_for(VIEWER, 5), 0);
        assert_eq!(dislikes.rows_for(VIEWER, 5), 1);
    }

    #[tokio::test]
    async fn reacting_to_missing_post_is_not_found() {
        let (enforcer, _, _) = enforcer();

        let err = enforcer
            .react(VIEWER, 404, ReactionKind::Like)
            .await
            .expect_err("post is missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn withdraw_twice_reports_not_found_second_time() {
        let (enforcer, likes, _) = enforcer();
        enforcer
            .react(VIEWER, 5, ReactionKind::Like)
            .await
            .expect("like must succeed");

        enforcer
            .withdraw(VIEWER, 5, ReactionKind::Like)
            .await
            .expect("first unlike must succeed");
        let err = enforcer
            .withdraw(VIEWER, 5, ReactionKind::Like)
            .await
            .expect_err("second unlike must fail");

        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(likes.rows_for(VIEWER, 5), 0);
    }

    #[tokio::test]
    async fn concurrent_opposite_reactions_leave_exactly_one() {
        let (enforcer, likes, dislikes) = enforcer();
        let enforcer = Arc::new(enforcer);

        let like = {
            let enforcer = Arc::clone(&enforcer);
            tokio::spawn(async move { enforcer.react(VIEWER, 5, ReactionKind::Like).await })
        };
        let dislike = {
            let enforcer = Arc::clone(&enforcer);
            tokio::spawn(async move { enforcer.react(VIEWER, 5, ReactionKind::Dislike).await })
        };

        let outcomes = [
            like.await.expect("like task panicked"),
            dislike.await.expect("dislike task panicked"),
        ];

        assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
        assert_eq!(likes.rows_for(VIEWER, 5) + dislikes.rows_for(VIEWER, 5), 1);
    }

    #[tokio::test]
    async fn pair_locks_tolerate_zero_stripes() {
        let locks = PairLocks::new(0);
        let _guard = locks.lock(VIEWER, 1).await;
    }
}
