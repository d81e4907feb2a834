//! In-memory fakes for the repository and client traits.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::post_service::PostService;
use crate::clients::error::ClientError;
use crate::clients::identity_client::IdentityClient;
use crate::clients::media_client::MediaClient;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostRepository};
use crate::data::reaction_repository::ReactionRepository;
use crate::domain::comment::Comment;
use crate::domain::engagement::{Reaction, ReactionKind};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Clone, Default)]
pub(crate) struct FakePostRepo {
    posts: Arc<Mutex<Vec<Post>>>,
}

impl FakePostRepo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, id: i64, author_email: &str, description: &str, created_at: i64) {
        let post = Post {
            id,
            description: description.to_string(),
            author_email: author_email.to_string(),
            created_at,
            media_id: id * 10,
            marked_inappropriate: false,
        };
        self.posts.lock().expect("posts mutex poisoned").push(post);
    }

    pub(crate) fn snapshot(&self, id: i64) -> Option<Post> {
        self.posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .find(|post| post.id == id)
            .cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.posts.lock().expect("posts mutex poisoned").len()
    }
}

#[async_trait]
impl PostRepository for FakePostRepo {
    async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.lock().expect("posts mutex poisoned").clone())
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.snapshot(id))
    }

    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut posts = self.posts.lock().expect("posts mutex poisoned");
        let id = posts.iter().map(|post| post.id).max().unwrap_or(0) + 1;
        let post = Post {
            id,
            description: input.description,
            author_email: input.author_email,
            created_at: input.created_at,
            media_id: input.media_id,
            marked_inappropriate: false,
        };
        posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, post: &Post) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.lock().expect("posts mutex poisoned");
        match posts.iter_mut().find(|stored| stored.id == post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut posts = self.posts.lock().expect("posts mutex poisoned");
        let before = posts.len();
        posts.retain(|post| post.id != id);
        Ok(posts.len() != before)
    }

    async fn list_by_author(&self, author_email: &str) -> Result<Vec<Post>, DomainError> {
        Ok(self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .filter(|post| post.author_email == author_email)
            .cloned()
            .collect())
    }

    async fn list_flagged(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .filter(|post| post.marked_inappropriate)
            .cloned()
            .collect())
    }

    async fn search_by_mention(&self, tag: &str) -> Result<Vec<Post>, DomainError> {
        let needle = format!("@{tag}");
        Ok(self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .filter(|post| post.description.contains(&needle))
            .cloned()
            .collect())
    }
}

/// Enforces the (viewer, post) uniqueness a real table has.
#[derive(Clone)]
pub(crate) struct FakeReactionRepo {
    kind: ReactionKind,
    rows: Arc<Mutex<Vec<Reaction>>>,
}

impl FakeReactionRepo {
    pub(crate) fn new(kind: ReactionKind) -> Self {
        Self {
            kind,
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn rows_for(&self, viewer_email: &str, post_id: i64) -> usize {
        self.rows
            .lock()
            .expect("reaction rows mutex poisoned")
            .iter()
            .filter(|row| row.viewer_email == viewer_email && row.post_id == post_id)
            .count()
    }
}

#[async_trait]
impl ReactionRepository for FakeReactionRepo {
    fn kind(&self) -> ReactionKind {
        self.kind
    }

    async fn create(&self, viewer_email: &str, post_id: i64) -> Result<Reaction, DomainError> {
        let mut rows = self.rows.lock().expect("reaction rows mutex poisoned");
        if rows
            .iter()
            .any(|row| row.viewer_email == viewer_email && row.post_id == post_id)
        {
            return Err(DomainError::Conflict(
                self.kind.already_exists_message().to_string(),
            ));
        }
        let reaction = Reaction {
            id: rows.len() as i64 + 1,
            viewer_email: viewer_email.to_string(),
            post_id,
        };
        rows.push(reaction.clone());
        Ok(reaction)
    }

    async fn find(
        &self,
        viewer_email: &str,
        post_id: i64,
    ) -> Result<Option<Reaction>, DomainError> {
        Ok(self
            .rows
            .lock()
            .expect("reaction rows mutex poisoned")
            .iter()
            .find(|row| row.viewer_email == viewer_email && row.post_id == post_id)
            .cloned())
    }

    async fn delete(&self, viewer_email: &str, post_id: i64) -> Result<bool, DomainError> {
        let mut rows = self.rows.lock().expect("reaction rows mutex poisoned");
        let before = rows.len();
        rows.retain(|row| !(row.viewer_email == viewer_email && row.post_id == post_id));
        Ok(rows.len() != before)
    }

    async fn count_for_post(&self, post_id: i64) -> Result<u64, DomainError> {
        Ok(self
            .rows
            .lock()
            .expect("reaction rows mutex poisoned")
            .iter()
            .filter(|row| row.post_id == post_id)
            .count() as u64)
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeCommentRepo {
    rows: Arc<Mutex<Vec<Comment>>>,
}

impl FakeCommentRepo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn all(&self) -> Vec<Comment> {
        self.rows.lock().expect("comment rows mutex poisoned").clone()
    }
}

#[async_trait]
impl CommentRepository for FakeCommentRepo {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut rows = self.rows.lock().expect("comment rows mutex poisoned");
        let comment = Comment {
            id: rows.len() as i64 + 1,
            post_id: input.post_id,
            author_email: input.author_email,
            text: input.text,
            created_at: input.created_at,
        };
        rows.push(comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        Ok(self
            .rows
            .lock()
            .expect("comment rows mutex poisoned")
            .iter()
            .filter(|row| row.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct MediaState {
    images: HashMap<i64, String>,
    fail_save: bool,
    fail_get: bool,
    saves: usize,
}

#[derive(Clone, Default)]
pub(crate) struct FakeMediaClient {
    state: Arc<Mutex<MediaState>>,
}

impl FakeMediaClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_saves(&self) {
        self.state.lock().expect("media mutex poisoned").fail_save = true;
    }

    pub(crate) fn fail_gets(&self) {
        self.state.lock().expect("media mutex poisoned").fail_get = true;
    }

    pub(crate) fn saves(&self) -> usize {
        self.state.lock().expect("media mutex poisoned").saves
    }
}

#[async_trait]
impl MediaClient for FakeMediaClient {
    async fn save_media(&self, image_base64: &str) -> Result<i64, ClientError> {
        let mut state = self.state.lock().expect("media mutex poisoned");
        if state.fail_save {
            return Err(ClientError::Status(tonic::Status::internal("disk full")));
        }
        state.saves += 1;
        let id = 1000 + state.saves as i64;
        state.images.insert(id, image_base64.to_string());
        Ok(id)
    }

    async fn get_media(&self, media_id: i64) -> Result<String, ClientError> {
        let state = self.state.lock().expect("media mutex poisoned");
        if state.fail_get {
            return Err(ClientError::Status(tonic::Status::unavailable("media down")));
        }
        Ok(state
            .images
            .get(&media_id)
            .cloned()
            .unwrap_or_else(|| format!("image-{media_id}")))
    }
}

#[derive(Default)]
struct IdentityState {
    taggable: HashSet<String>,
    favorites: HashSet<(String, i64)>,
    following: HashMap<String, Vec<String>>,
    fail_taggable: bool,
    fail_names: bool,
    fail_favorites: bool,
    fail_following: bool,
    taggable_checks: usize,
    favorite_checks: usize,
}

#[derive(Clone, Default)]
pub(crate) struct FakeIdentityClient {
    state: Arc<Mutex<IdentityState>>,
}

impl FakeIdentityClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_taggable(&self, name: &str) {
        self.state
            .lock()
            .expect("identity mutex poisoned")
            .taggable
            .insert(name.to_string());
    }

    pub(crate) fn add_favorite(&self, viewer_email: &str, post_id: i64) {
        self.state
            .lock()
            .expect("identity mutex poisoned")
            .favorites
            .insert((viewer_email.to_string(), post_id));
    }

    pub(crate) fn set_following(&self, email: &str, followed: &[&str]) {
        self.state
            .lock()
            .expect("identity mutex poisoned")
            .following
            .insert(
                email.to_string(),
                followed.iter().map(|f| f.to_string()).collect(),
            );
    }

    pub(crate) fn fail_taggable_checks(&self) {
        self.state.lock().expect("identity mutex poisoned").fail_taggable = true;
    }

    pub(crate) fn fail_names(&self) {
        self.state.lock().expect("identity mutex poisoned").fail_names = true;
    }

    pub(crate) fn fail_favorites(&self) {
        self.state.lock().expect("identity mutex poisoned").fail_favorites = true;
    }

    pub(crate) fn fail_following(&self) {
        self.state.lock().expect("identity mutex poisoned").fail_following = true;
    }

    pub(crate) fn taggable_checks(&self) -> usize {
        self.state.lock().expect("identity mutex poisoned").taggable_checks
    }

    pub(crate) fn favorite_checks(&self) -> usize {
        self.state.lock().expect("identity mutex poisoned").favorite_checks
    }
}

#[async_trait]
impl IdentityClient for FakeIdentityClient {
    async fn display_name(&self, email: &str) -> Result<String, ClientError> {
        let state = self.state.lock().expect("identity mutex poisoned");
        if state.fail_names {
            return Err(ClientError::Status(tonic::Status::internal("users down")));
        }
        Ok(email.split('@').next().unwrap_or(email).to_string())
    }

    async fn is_post_favorited(
        &self,
        viewer_email: &str,
        post_id: i64,
    ) -> Result<bool, ClientError> {
        let mut state = self.state.lock().expect("identity mutex poisoned");
        state.favorite_checks += 1;
        if state.fail_favorites {
            return Err(ClientError::Status(tonic::Status::internal("users down")));
        }
        Ok(state
            .favorites
            .contains(&(viewer_email.to_string(), post_id)))
    }

    async fn is_taggable(&self, name: &str) -> Result<bool, ClientError> {
        let mut state = self.state.lock().expect("identity mutex poisoned");
        state.taggable_checks += 1;
        if state.fail_taggable {
            return Err(ClientError::Status(tonic::Status::unavailable("users down")));
        }
        Ok(state.taggable.contains(name))
    }

    async fn following(&self, email: &str) -> Result<Vec<String>, ClientError> {
        let state = self.state.lock().expect("identity mutex poisoned");
        if state.fail_following {
            return Err(ClientError::Status(tonic::Status::internal("users down")));
        }
        Ok(state.following.get(email).cloned().unwrap_or_default())
    }
}

/// All fakes wired into one [`PostService`].
#[derive(Clone)]
pub(crate) struct Fixture {
    pub(crate) posts: FakePostRepo,
    pub(crate) likes: FakeReactionRepo,
    pub(crate) dislikes: FakeReactionRepo,
    pub(crate) comments: FakeCommentRepo,
    pub(crate) media: FakeMediaClient,
    pub(crate) identity: FakeIdentityClient,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            posts: FakePostRepo::new(),
            likes: FakeReactionRepo::new(ReactionKind::Like),
            dislikes: FakeReactionRepo::new(ReactionKind::Dislike),
            comments: FakeCommentRepo::new(),
            media: FakeMediaClient::new(),
            identity: FakeIdentityClient::new(),
        }
    }

    pub(crate) fn service(&self) -> PostService {
        PostService::new(
            Arc::new(self.posts.clone()),
            Arc::new(self.likes.clone()),
            Arc::new(self.dislikes.clone()),
            Arc::new(self.comments.clone()),
            Arc::new(self.media.clone()),
            Arc::new(self.identity.clone()),
        )
    }
}
