//! JWT signing and verification using HMAC (HS256, HS384, HS512).

use std::str::FromStr;
use std::sync::Arc;

use application::error::{ApplicationError, Result, ToInternal};
use application::ports::outbound::{Clock, TokenClaims, TokenService};
use domain::auth::token::TokenType;
use domain::identity::id::UserId;
use domain::identity::role::Role;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Algorithms accepted for signing.
pub const SUPPORTED_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// Settings of [`JwtTokenService`].
pub struct JwtConfig {
    pub secret: Zeroizing<String>,
    pub algorithm: String,
    /// Access token lifetime in seconds.
    pub access_ttl: u64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl: u64,
    /// Written to and required in the `iss` claim.
    pub issuer: String,
}

/// JWT signer and verifier.
pub struct JwtTokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: u64,
    refresh_ttl: u64,
    issuer: String,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Create a new [`JwtTokenService`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the algorithm is not one of
    /// [`SUPPORTED_ALGORITHMS`].
    pub fn new(config: JwtConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let algorithm = Algorithm::from_str(&config.algorithm).catch()?;
        if !SUPPORTED_ALGORITHMS.contains(&config.algorithm.as_str()) {
            return Err(ApplicationError::internal(
                UnsupportedAlgorithm(config.algorithm),
            ));
        }

        let mut validation = Validation::new(algorithm);
        // Expiry is checked against the injected clock instead.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            issuer: config.issuer,
            clock,
        })
    }

    fn sign(
        &self,
        user_id: &UserId,
        role: Option<Role>,
        token_type: TokenType,
        ttl: u64,
    ) -> Result<String> {
        let iat = self.clock.timestamp();
        let exp = iat
            .checked_add(ttl)
            .ok_or_else(|| ApplicationError::internal(TtlOverflow(ttl)))?;
        let claims = JwtClaims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            token_type,
            role,
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .catch()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    iss: String,
    #[serde(rename = "type")]
    token_type: TokenType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    iat: u64,
    exp: u64,
    jti: String,
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported signing algorithm: {0}")]
struct UnsupportedAlgorithm(String);

#[derive(Debug, thiserror::Error)]
#[error("token lifetime of {0} seconds overflows the expiry timestamp")]
struct TtlOverflow(u64);

impl TokenService for JwtTokenService {
    fn issue_access(&self, user_id: &UserId, role: Role) -> Result<String> {
        self.sign(user_id, Some(role), TokenType::Access, self.access_ttl)
    }

    fn issue_refresh(&self, user_id: &UserId) -> Result<String> {
        self.sign(user_id, None, TokenType::Refresh, self.refresh_ttl)
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<TokenClaims> {
        let claims =
            decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
                .map_err(|err| {
                    tracing::debug!(error = %err, "token rejected");
                    ApplicationError::Token
                })?
                .claims;

        let expired = claims.exp <= self.clock.timestamp();
        if expired || claims.token_type != expected {
            return Err(ApplicationError::Token);
        }

        let sub =
            UserId::parse(&claims.sub).map_err(|_| ApplicationError::Token)?;

        let role = match (expected, claims.role) {
            (TokenType::Access, None) => return Err(ApplicationError::Token),
            (TokenType::Access, role) => role,
            (TokenType::Refresh, _) => None,
        };

        Ok(TokenClaims {
            sub,
            role,
            token_type: claims.token_type,
            iat: claims.iat,
            exp: claims.exp,
            jti: claims.jti,
        })
    }

    fn access_ttl(&self) -> u64 {
        self.access_ttl
    }
}
