//! Administration of user accounts.

use application::dto::UserView;
use application::error::ApplicationError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, patch, post};
use axum::{Extension, Json, Router, middleware};
use domain::identity::id::UserId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::router::{CurrentUser, Valid};
use crate::{AppState, ServerError};

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct StatusBody {
    is_active: bool,
}

/// A malformed identifier cannot name an existing account.
fn user_id(id: &str) -> Result<UserId> {
    UserId::parse(id)
        .map_err(|_| ServerError::from(ApplicationError::UserNotFound))
}

async fn status(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<String>,
    Valid(body): Valid<StatusBody>,
) -> Result<Json<UserView>> {
    let user = state
        .account
        .set_active(&user_id(&id)?, body.is_active)
        .await?;
    tracing::info!(
        admin = %admin.id,
        user = %user.id,
        is_active = body.is_active,
        "account status changed"
    );

    Ok(Json(user))
}

async fn verify(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>> {
    Ok(Json(state.account.mark_verified(&user_id(&id)?).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.account.delete(&user_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `PATCH /users/{id}/status` goes to `status`. Admin only.
        .route("/{user_id}/status", patch(status))
        // `POST /users/{id}/verify` goes to `verify`. Admin only.
        .route("/{user_id}/verify", post(verify))
        // `DELETE /users/{id}` goes to `remove`. Admin only.
        .route("/{user_id}", delete(remove))
        .route_layer(middleware::from_fn(super::admin_only))
        .route_layer(middleware::from_fn_with_state(state, super::auth))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use domain::identity::role::Role;
    use serde_json::json;

    use crate::router::tests::{PASSWORD, register};
    use crate::*;

    use super::*;

    fn token(state: &AppState, role: Role) -> String {
        state.token.issue_access(&UserId::generate(), role).unwrap()
    }

    #[tokio::test]
    async fn test_customer_is_forbidden() {
        let state = test_state();
        let app = app(state.clone());
        let user = register(&app, "a@example.com").await;

        let response = make_request(
            app.clone(),
            Method::DELETE,
            &format!("/api/v1/users/{}", user.id),
            String::default(),
            Some(&token(&state, Role::Customer)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = make_request(
            app,
            Method::DELETE,
            &format!("/api/v1/users/{}", user.id),
            String::default(),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_status_handler() {
        let state = test_state();
        let app = app(state.clone());
        let admin = token(&state, Role::Admin);
        let user = register(&app, "a@example.com").await;

        let response = make_request(
            app.clone(),
            Method::PATCH,
            &format!("/api/v1/users/{}/status", user.id),
            json!({ "is_active": false }).to_string(),
            Some(&admin),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let view: UserView = json_body(response).await;
        assert!(!view.is_active);

        // Deactivated accounts cannot log in anymore.
        let response = make_request(
            app,
            Method::POST,
            "/api/v1/auth/login",
            json!({ "email": "a@example.com", "password": PASSWORD })
                .to_string(),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_verify_handler() {
        let state = test_state();
        let app = app(state.clone());
        let admin = token(&state, Role::Admin);
        let user = register(&app, "a@example.com").await;

        let response = make_request(
            app,
            Method::POST,
            &format!("/api/v1/users/{}/verify", user.id),
            String::default(),
            Some(&admin),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let view: UserView = json_body(response).await;
        assert!(view.is_verified);
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        let app = app(state.clone());
        let admin = token(&state, Role::Admin);
        let user = register(&app, "a@example.com").await;
        let path = format!("/api/v1/users/{}", user.id);

        let response = make_request(
            app.clone(),
            Method::DELETE,
            &path,
            String::default(),
            Some(&admin),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = make_request(
            app.clone(),
            Method::DELETE,
            &path,
            String::default(),
            Some(&admin),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // The address is free again.
        register(&app, "a@example.com").await;
    }

    #[tokio::test]
    async fn test_unknown_or_malformed_id() {
        let state = test_state();
        let app = app(state.clone());
        let admin = token(&state, Role::Admin);

        for id in [UserId::generate().to_string(), "not-a-uuid".to_string()] {
            let response = make_request(
                app.clone(),
                Method::POST,
                &format!("/api/v1/users/{id}/verify"),
                String::default(),
                Some(&admin),
            )
            .await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }
}
