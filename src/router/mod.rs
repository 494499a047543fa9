//! HTTP API.
pub mod auth;
pub mod status;
pub mod users;

use axum::extract::{FromRequest, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};
use domain::auth::token::TokenType;
use domain::identity::id::UserId;
use domain::identity::role::Role;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{AppState, ServerError};

const BEARER: &str = "bearer";

/// JSON body checked against its `validator` rules.
#[derive(Debug, Clone)]
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;

        Ok(Valid(value))
    }
}

/// Bearer of a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
}

/// Extract the token of an `Authorization: Bearer <token>` header value.
/// The scheme is case-insensitive.
fn bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case(BEARER) && !token.is_empty()).then_some(token)
}

/// Custom middleware for authentification.
///
/// Only access tokens are accepted. The bearer is made available to
/// handlers as an [`Extension<CurrentUser>`].
pub async fn auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer)
        .ok_or(ServerError::Unauthorized)?;

    let claims = state.token.verify(token, TokenType::Access)?;
    let role = claims.role.ok_or(ServerError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        role,
    });
    Ok(next.run(req).await)
}

/// Reject bearers without the administrator role.
///
/// Must run after [`auth`].
pub async fn admin_only(
    Extension(user): Extension<CurrentUser>,
    req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if user.role != Role::Admin {
        tracing::warn!(user = %user.id, "non-admin bearer on admin route");
        return Err(ServerError::Forbidden);
    }

    Ok(next.run(req).await)
}
