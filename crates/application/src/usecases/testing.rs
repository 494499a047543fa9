//! In-process stand-ins for outbound ports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use domain::auth::password::{Password, PasswordHash};
use domain::auth::token::TokenType;
use domain::identity::email::EmailAddress;
use domain::identity::id::UserId;
use domain::identity::role::Role;
use domain::identity::user::User;

use crate::error::{ApplicationError, Result};
use crate::ports::outbound::{
    Clock, PasswordHasher, TelemetryPort, TokenClaims, TokenService,
    UserRepository,
};
use crate::usecases::{
    AccountUseCase, LoginUseCase, RefreshTokenUseCase, RegisterUseCase,
};

#[derive(Default)]
pub struct StubRepository {
    users: Mutex<HashMap<UserId, User>>,
    hide_existing: AtomicBool,
    fail_next: AtomicBool,
}

impl StubRepository {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Makes `exists_by_email` answer `false` from now on.
    pub fn hide_existing_emails(&self) {
        self.hide_existing.store(true, Ordering::SeqCst);
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ApplicationError::internal(std::io::Error::other(
                "connection reset",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for StubRepository {
    async fn create(&self, user: &User) -> Result<()> {
        self.check_failure()?;
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email() == user.email()) {
            return Err(ApplicationError::AlreadyExists);
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>> {
        self.check_failure()?;
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email() == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        self.check_failure()?;
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.check_failure()?;
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            },
            None => Err(ApplicationError::UserNotFound),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<bool> {
        self.check_failure()?;
        Ok(self.users.lock().unwrap().remove(id).is_some())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool> {
        self.check_failure()?;
        if self.hide_existing.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let users = self.users.lock().unwrap();
        Ok(users.values().any(|u| u.email() == email))
    }
}

/// Stores `$plain$<n>$<password>`, salted by a counter.
#[derive(Default)]
pub struct PlainHasher {
    counter: AtomicU64,
    pub verifications: AtomicU64,
}

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(PasswordHash::parse(format!("$plain${n}${}", password.as_str()))?)
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        hash.as_str()
            .rsplit('$')
            .next()
            .is_some_and(|stored| stored == plaintext)
    }
}

/// Tokens shaped `<kind>:<user id>:<role>`.
pub struct StubTokens;

impl TokenService for StubTokens {
    fn issue_access(&self, user_id: &UserId, role: Role) -> Result<String> {
        Ok(format!("access:{user_id}:{role}"))
    }

    fn issue_refresh(&self, user_id: &UserId) -> Result<String> {
        Ok(format!("refresh:{user_id}:"))
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<TokenClaims> {
        let mut parts = token.split(':');
        let (Some(kind), Some(sub), Some(role)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(ApplicationError::Token);
        };

        if kind != expected.as_str() {
            return Err(ApplicationError::Token);
        }

        Ok(TokenClaims {
            sub: UserId::parse(sub).map_err(|_| ApplicationError::Token)?,
            role: role.parse().ok(),
            token_type: expected,
            iat: 0,
            exp: u64::MAX,
            jti: String::new(),
        })
    }

    fn access_ttl(&self) -> u64 {
        1800
    }
}

#[derive(Default)]
pub struct RecordingTelemetry {
    pub events: Mutex<Vec<String>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetryPort for RecordingTelemetry {
    fn record_auth_success(&self, _user_id: &str, method: &str) {
        self.events.lock().unwrap().push(format!("success:{method}"));
    }

    fn record_auth_failure(&self, reason: &str) {
        self.events.lock().unwrap().push(format!("failure:{reason}"));
    }

    fn record_account_created(&self, _user_id: &str) {
        self.events.lock().unwrap().push("created".into());
    }

    fn record_account_updated(&self, _user_id: &str, change: &str) {
        self.events.lock().unwrap().push(format!("updated:{change}"));
    }
}

pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self(Mutex::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Default)]
pub struct TestEnv {
    pub repo: Arc<StubRepository>,
    pub hasher: Arc<PlainHasher>,
    pub telemetry: Arc<RecordingTelemetry>,
    pub clock: Arc<FixedClock>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> RegisterUseCase {
        RegisterUseCase::new(
            self.repo.clone(),
            self.hasher.clone(),
            self.telemetry.clone(),
            self.clock.clone(),
        )
    }

    pub fn login(&self) -> LoginUseCase {
        LoginUseCase::new(
            self.repo.clone(),
            self.hasher.clone(),
            Arc::new(StubTokens),
            self.telemetry.clone(),
        )
        .unwrap()
    }

    pub fn refresh(&self) -> RefreshTokenUseCase {
        RefreshTokenUseCase::new(
            self.repo.clone(),
            Arc::new(StubTokens),
            self.telemetry.clone(),
        )
    }

    pub fn account(&self) -> AccountUseCase {
        AccountUseCase::new(
            self.repo.clone(),
            self.hasher.clone(),
            self.telemetry.clone(),
            self.clock.clone(),
        )
    }

    /// Stores a user whose password is `password`.
    pub async fn seed(&self, email: &str, password: &str, role: Role) -> User {
        let hash = self.hasher.hash(&Password::new(password).unwrap()).unwrap();
        let user = User::builder()
            .email(EmailAddress::parse(email).unwrap())
            .password(hash)
            .role(role)
            .build(self.clock.now())
            .unwrap();
        self.repo.create(&user).await.unwrap();
        user
    }
}
