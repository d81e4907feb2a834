use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::domain::error::DomainError;
use crate::infrastructure::jwt::JwtService;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) email: String,
    pub(crate) is_admin: bool,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AdminUser(pub(crate) AuthenticatedUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(DomainError::Forbidden.into());
        }
        Ok(AdminUser(user))
    }
}

/// Viewer for public reads: anonymous without an `Authorization` header, but a
/// header that is present must carry a valid token.
#[derive(Debug, Clone, Default)]
pub(crate) struct OptionalViewer(pub(crate) Option<String>);

impl OptionalViewer {
    pub(crate) fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<AppState> for OptionalViewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(OptionalViewer(None));
        }
        let user = authenticate(&state.jwt, &parts.headers)?;
        Ok(OptionalViewer(Some(user.email)))
    }
}

pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state.jwt, request.headers())?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn authenticate(jwt: &JwtService, headers: &HeaderMap) -> Result<AuthenticatedUser, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next().ok_or(AppError::Unauthorized)?;
    let token = parts.next().ok_or(AppError::Unauthorized)?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized);
    }

    let claims = jwt
        .verify_token(token)
        .map_err(|_| AppError::Unauthorized)?;

    Ok(AuthenticatedUser {
        is_admin: claims.is_admin(),
        email: claims.email,
    })
}
