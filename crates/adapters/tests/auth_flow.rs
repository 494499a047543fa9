//! Registration, login and refresh wired to the real adapters.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use adapters::outbound::crypto::Argon2PasswordHasher;
use adapters::outbound::jwt::{JwtConfig, JwtTokenService};
use adapters::outbound::persistence::InMemoryUserRepository;
use adapters::outbound::telemetry::TracingTelemetry;
use application::dto::{
    ChangePasswordRequestDto, LoginRequestDto, RefreshTokenRequestDto,
    RegisterRequestDto,
};
use application::error::ApplicationError;
use application::ports::inbound::{
    Login, ManageAccount, RefreshAccessToken, Register,
};
use application::ports::outbound::{
    Clock, PasswordHasher, TokenService, UserRepository,
};
use application::usecases::{
    AccountUseCase, LoginUseCase, RefreshTokenUseCase, RegisterUseCase,
};
use chrono::{DateTime, Duration, Utc};
use domain::auth::token::TokenType;
use domain::identity::email::EmailAddress;
use domain::identity::id::UserId;
use domain::identity::role::Role;
use zeroize::Zeroizing;

/// Clock moved by hand, in whole seconds.
struct StepClock(AtomicI64);

impl StepClock {
    fn advance(&self, by: Duration) {
        self.0.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0.load(Ordering::SeqCst), 0).unwrap()
    }
}

struct Service {
    repo: Arc<InMemoryUserRepository>,
    hasher: Arc<Argon2PasswordHasher>,
    tokens: Arc<JwtTokenService>,
    clock: Arc<StepClock>,
    register: RegisterUseCase,
    login: LoginUseCase,
    refresh: RefreshTokenUseCase,
    account: AccountUseCase,
}

fn service() -> Service {
    let repo = Arc::new(InMemoryUserRepository::new());
    let hasher = Arc::new(Argon2PasswordHasher::new(1024, 1, 1).unwrap());
    let telemetry = Arc::new(TracingTelemetry::new());
    let clock = Arc::new(StepClock(AtomicI64::new(1_735_689_600)));
    let tokens = Arc::new(
        JwtTokenService::new(
            JwtConfig {
                secret: Zeroizing::new(
                    "integration-secret-with-more-than-32-bytes".into(),
                ),
                algorithm: "HS256".into(),
                access_ttl: 1800,
                refresh_ttl: 604_800,
                issuer: "dhakacart".into(),
            },
            clock.clone(),
        )
        .unwrap(),
    );

    Service {
        register: RegisterUseCase::new(
            repo.clone(),
            hasher.clone(),
            telemetry.clone(),
            clock.clone(),
        ),
        login: LoginUseCase::new(
            repo.clone(),
            hasher.clone(),
            tokens.clone(),
            telemetry.clone(),
        )
        .unwrap(),
        refresh: RefreshTokenUseCase::new(
            repo.clone(),
            tokens.clone(),
            telemetry.clone(),
        ),
        account: AccountUseCase::new(
            repo.clone(),
            hasher.clone(),
            telemetry,
            clock.clone(),
        ),
        repo,
        hasher,
        tokens,
        clock,
    }
}

fn registration(email: &str) -> RegisterRequestDto {
    RegisterRequestDto {
        email: email.into(),
        password: "Password123".into(),
        full_name: "A B".into(),
        phone: None,
    }
}

fn login(email: &str, password: &str) -> LoginRequestDto {
    LoginRequestDto {
        email: email.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn test_register_then_login_scenario() {
    let service = service();

    let user = service
        .register
        .execute(registration("a@x.com"))
        .await
        .unwrap();
    assert!(UserId::parse(&user.id).is_ok());
    assert!(user.is_active);
    assert!(!user.is_verified);

    let err = service
        .register
        .execute(registration("a@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::AlreadyExists));

    let pair = service
        .login
        .execute(login("a@x.com", "Password123"))
        .await
        .unwrap();
    assert_eq!(pair.token_type, "bearer");
    assert_eq!(pair.expires_in, 1800);

    let err = service
        .login
        .execute(login("a@x.com", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::InvalidCredentials));
}

#[tokio::test]
async fn test_stored_hash_is_not_plaintext() {
    let service = service();
    service
        .register
        .execute(registration("a@x.com"))
        .await
        .unwrap();

    let stored = service
        .repo
        .find_by_email(&EmailAddress::parse("a@x.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    let hash = stored.password();

    assert_ne!(hash.as_str(), "Password123");
    assert!(service.hasher.verify("Password123", hash));
    assert!(!service.hasher.verify("Password12", hash));
    assert!(!service.hasher.verify("", hash));
    assert!(!service.hasher.verify(hash.as_str(), hash));
}

#[tokio::test]
async fn test_issued_tokens_are_typed() {
    let service = service();
    let user = service
        .register
        .execute(registration("a@x.com"))
        .await
        .unwrap();
    let pair = service
        .login
        .execute(login("a@x.com", "Password123"))
        .await
        .unwrap();

    let access = service
        .tokens
        .verify(&pair.access_token, TokenType::Access)
        .unwrap();
    assert_eq!(access.sub.to_string(), user.id);
    assert_eq!(access.role, Some(Role::Customer));

    let refresh = service
        .tokens
        .verify(&pair.refresh_token, TokenType::Refresh)
        .unwrap();
    assert_eq!(refresh.sub.to_string(), user.id);

    assert!(matches!(
        service.tokens.verify(&pair.access_token, TokenType::Refresh),
        Err(ApplicationError::Token)
    ));
    assert!(matches!(
        service.tokens.verify(&pair.refresh_token, TokenType::Access),
        Err(ApplicationError::Token)
    ));
}

#[tokio::test]
async fn test_unknown_email_matches_wrong_password() {
    let service = service();
    service
        .register
        .execute(registration("a@x.com"))
        .await
        .unwrap();

    let unknown = service
        .login
        .execute(login("ghost@x.com", "Password123"))
        .await
        .unwrap_err();
    let wrong = service
        .login
        .execute(login("a@x.com", "Password124"))
        .await
        .unwrap_err();

    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn test_deactivated_account_cannot_login_or_refresh() {
    let service = service();
    let user = service
        .register
        .execute(registration("a@x.com"))
        .await
        .unwrap();
    let pair = service
        .login
        .execute(login("a@x.com", "Password123"))
        .await
        .unwrap();

    let id = UserId::parse(&user.id).unwrap();
    service.account.set_active(&id, false).await.unwrap();

    let err = service
        .login
        .execute(login("a@x.com", "Password123"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::AccountDeactivated));
    assert_ne!(err.to_string(), ApplicationError::InvalidCredentials.to_string());

    let err = service
        .refresh
        .execute(RefreshTokenRequestDto {
            refresh_token: pair.refresh_token,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::AccountDeactivated));
}

#[tokio::test]
async fn test_refresh_after_access_expiry() {
    let service = service();
    service
        .register
        .execute(registration("a@x.com"))
        .await
        .unwrap();
    let pair = service
        .login
        .execute(login("a@x.com", "Password123"))
        .await
        .unwrap();

    service.clock.advance(Duration::seconds(1800));
    assert!(
        service
            .tokens
            .verify(&pair.access_token, TokenType::Access)
            .is_err()
    );

    let renewed = service
        .refresh
        .execute(RefreshTokenRequestDto {
            refresh_token: pair.refresh_token,
        })
        .await
        .unwrap();
    assert!(
        service
            .tokens
            .verify(&renewed.access_token, TokenType::Access)
            .is_ok()
    );
}

#[tokio::test]
async fn test_change_password_then_login() {
    let service = service();
    let user = service
        .register
        .execute(registration("a@x.com"))
        .await
        .unwrap();
    let id = UserId::parse(&user.id).unwrap();

    service
        .account
        .change_password(
            &id,
            ChangePasswordRequestDto {
                current_password: "Password123".into(),
                new_password: "Another-Pass-1".into(),
            },
        )
        .await
        .unwrap();

    assert!(
        service
            .login
            .execute(login("a@x.com", "Password123"))
            .await
            .is_err()
    );
    assert!(
        service
            .login
            .execute(login("a@x.com", "Another-Pass-1"))
            .await
            .is_ok()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_create_one_user() {
    let service = Arc::new(service());

    let handles: Vec<_> = ["a@x.com", "A@x.com", "a@X.COM", " a@x.com "]
        .into_iter()
        .map(|email| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service.register.execute(registration(email)).await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(ApplicationError::AlreadyExists) => {},
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(service.repo.len().await, 1);
}
