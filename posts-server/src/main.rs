use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

mod application;
mod clients;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::post_service::PostService;
use clients::grpc::RemoteEndpoint;
use clients::grpc::identity_client::GrpcIdentityClient;
use clients::grpc::media_client::GrpcMediaClient;
use data::repositories::postgres::comment_repository::PostgresCommentRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::reaction_repository::PostgresReactionRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let media = GrpcMediaClient::new(&RemoteEndpoint {
        url: settings.media_service_url.clone(),
        call_timeout: settings.remote_call_timeout(),
        max_message_size_bytes: settings.grpc_max_decoding_message_size_bytes,
    })
    .context("invalid MEDIA_SERVICE_URL")?;
    let identity = GrpcIdentityClient::new(&RemoteEndpoint {
        url: settings.identity_service_url.clone(),
        call_timeout: settings.remote_call_timeout(),
        max_message_size_bytes: settings.grpc_max_decoding_message_size_bytes,
    })
    .context("invalid IDENTITY_SERVICE_URL")?;

    let post_service = PostService::new(
        Arc::new(PostgresPostRepository::new(pool.clone())),
        Arc::new(PostgresReactionRepository::likes(pool.clone())),
        Arc::new(PostgresReactionRepository::dislikes(pool.clone())),
        Arc::new(PostgresCommentRepository::new(pool)),
        Arc::new(media),
        Arc::new(identity),
    );
    let state = AppState::new(
        Arc::new(post_service),
        Arc::new(JwtService::new(&settings.jwt_secret)),
    );

    info!(
        media = %settings.media_service_url,
        identity = %settings.identity_service_url,
        "posts service starting"
    );
    tokio::try_join!(
        server::run_http(&settings, state.clone()),
        server::run_grpc(&settings, state),
    )?;

    Ok(())
}
