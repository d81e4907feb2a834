use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::view::ModerationReport;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::{AdminUser, AuthenticatedUser};

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct DecisionDto {
    /// `true` removes the post, `false` clears its flag.
    pub(crate) delete: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ModerationReportDto {
    pub(crate) post_id: i64,
    pub(crate) description: String,
    pub(crate) author_email: String,
    /// Empty when the media service could not return the image.
    pub(crate) image: String,
}

impl From<ModerationReport> for ModerationReportDto {
    fn from(report: ModerationReport) -> Self {
        Self {
            post_id: report.post_id,
            description: report.description,
            author_email: report.author_email,
            image: report.image,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/report",
    tag = "moderation",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post flagged (or already flagged)"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn report_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.post_service.report_inappropriate(id).await?;
    info!(post_id = id, reporter = %auth.email, "post reported");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/posts/inappropriate",
    tag = "moderation",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Flagged posts", body = [ModerationReportDto]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    )
)]
pub(crate) async fn flagged_content(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<ModerationReportDto>>> {
    let reports = state.post_service.get_flagged_content().await?;
    Ok(Json(
        reports.into_iter().map(ModerationReportDto::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/decision",
    tag = "moderation",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = DecisionDto,
    responses(
        (status = 204, description = "Decision applied"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn decide(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(dto): Json<DecisionDto>,
) -> AppResult<StatusCode> {
    state.post_service.decide(id, dto.delete).await?;
    info!(post_id = id, delete = dto.delete, moderator = %admin.email, "moderation decision applied");
    Ok(StatusCode::NO_CONTENT)
}
