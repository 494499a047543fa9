//! Registration, login and session routes.

use application::dto::{
    ChangePasswordRequestDto, LoginRequestDto, RefreshTokenRequestDto,
    RegisterRequestDto, TokenPairDto, UserView,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::router::{CurrentUser, Valid};
use crate::AppState;

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct RegisterBody {
    #[validate(email(message = "Email must be formated."))]
    email: String,
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be 8 to 128 characters long."
    ))]
    password: String,
    #[validate(length(
        min = 2,
        max = 100,
        message = "Name must be 2 to 100 characters long."
    ))]
    full_name: String,
    phone: Option<String>,
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct LoginBody {
    #[validate(email(message = "Email must be formated."))]
    email: String,
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password must be 1 to 128 characters long."
    ))]
    password: String,
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct RefreshBody {
    #[validate(length(min = 1, message = "Refresh token is missing."))]
    refresh_token: String,
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct PasswordBody {
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password must be 1 to 128 characters long."
    ))]
    current_password: String,
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be 8 to 128 characters long."
    ))]
    new_password: String,
}

async fn register(
    State(state): State<AppState>,
    Valid(body): Valid<RegisterBody>,
) -> Result<(StatusCode, Json<UserView>)> {
    let user = state
        .register
        .execute(RegisterRequestDto {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            phone: body.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    Valid(body): Valid<LoginBody>,
) -> Result<Json<TokenPairDto>> {
    let pair = state
        .login
        .execute(LoginRequestDto {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(pair))
}

async fn refresh(
    State(state): State<AppState>,
    Valid(body): Valid<RefreshBody>,
) -> Result<Json<TokenPairDto>> {
    let pair = state
        .refresh
        .execute(RefreshTokenRequestDto {
            refresh_token: body.refresh_token,
        })
        .await?;

    Ok(Json(pair))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserView>> {
    Ok(Json(state.account.profile(&user.id).await?))
}

async fn password(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Valid(body): Valid<PasswordBody>,
) -> Result<StatusCode> {
    state
        .account
        .change_password(
            &user.id,
            ChangePasswordRequestDto {
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `GET /auth/me` goes to `me`. Authorization required.
        .route("/me", get(me))
        // `POST /auth/password` goes to `password`. Authorization required.
        .route("/password", post(password))
        .route_layer(middleware::from_fn_with_state(state, super::auth))
        // `POST /auth/register` goes to `register`.
        .route("/register", post(register))
        // `POST /auth/login` goes to `login`.
        .route("/login", post(login))
        // `POST /auth/refresh` goes to `refresh`.
        .route("/refresh", post(refresh))
}
