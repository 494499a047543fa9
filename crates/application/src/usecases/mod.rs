//! Application services implementing business logic.

pub mod account;
pub mod auth;
pub mod create_account;
pub mod refresh_token;

#[cfg(test)]
pub(crate) mod testing;

pub use account::*;
pub use auth::*;
pub use create_account::*;
pub use refresh_token::*;

use domain::identity::user::User;

use crate::dto::{TOKEN_TYPE, TokenPairDto};
use crate::error::Result;
use crate::ports::outbound::TokenService;

/// Issue one access and one refresh token for `user`.
fn issue_token_pair(token: &dyn TokenService, user: &User) -> Result<TokenPairDto> {
    let access_token = token.issue_access(&user.id(), user.role())?;
    let refresh_token = token.issue_refresh(&user.id())?;

    Ok(TokenPairDto {
        access_token,
        refresh_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: token.access_ttl(),
    })
}
