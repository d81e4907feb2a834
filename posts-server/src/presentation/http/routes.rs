use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::moderation::{decide, flagged_content, report_post};
use crate::presentation::http::handlers::posts::{
    all_posts, create_post, dislike, feed, like, post_comment, search_by_tag, undislike, unlike,
    users_posts,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/posts", posts_router(state))
}

fn posts_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(users_posts))
        .route("/search", get(search_by_tag));

    let protected = Router::new()
        .route("/", post(create_post))
        .route("/all", get(all_posts))
        .route("/feed", get(feed))
        .route("/inappropriate", get(flagged_content))
        .route("/{id}/like", post(like).delete(unlike))
        .route("/{id}/dislike", post(dislike).delete(undislike))
        .route("/{id}/comments", post(post_comment))
        .route("/{id}/report", post(report_post))
        .route("/{id}/decision", post(decide))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
