//! Account and session service of the dhakacart storefront.

#![forbid(unsafe_code)]

pub mod config;
mod database;
pub mod error;
mod router;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use adapters::outbound::clock::SystemClock;
use adapters::outbound::crypto::Argon2PasswordHasher;
use adapters::outbound::jwt::{JwtConfig, JwtTokenService};
use adapters::outbound::persistence::{
    InMemoryUserRepository, PgUserRepository,
};
use adapters::outbound::telemetry::TracingTelemetry;
use application::error::ApplicationError;
use application::ports::inbound::{
    Login, ManageAccount, RefreshAccessToken, Register,
};
use application::ports::outbound::{
    Clock, PasswordHasher, TelemetryPort, TokenService, UserRepository,
};
use application::usecases::{
    AccountUseCase, LoginUseCase, RefreshTokenUseCase, RegisterUseCase,
};
use axum::body::Bytes;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::get;
use axum::{Router, middleware as AxumMiddleware};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

pub use crate::config::Configuration;
pub use crate::error::ServerError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
    pub register: Arc<dyn Register>,
    pub login: Arc<dyn Login>,
    pub refresh: Arc<dyn RefreshAccessToken>,
    pub account: Arc<dyn ManageAccount>,
    pub token: Arc<dyn TokenService>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire use cases on top of a user store.
    ///
    /// # Errors
    ///
    /// Returns `Err` on invalid Argon2 parameters or signing algorithm.
    pub fn new(
        config: Arc<Configuration>,
        repo: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ApplicationError> {
        let argon2 = config.argon2();
        let hasher: Arc<dyn PasswordHasher> =
            Arc::new(Argon2PasswordHasher::new(
                argon2.memory_cost,
                argon2.iterations,
                argon2.parallelism,
            )?);
        let telemetry: Arc<dyn TelemetryPort> =
            Arc::new(TracingTelemetry::new());
        let token: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
            JwtConfig {
                secret: config.token.secret_key.clone(),
                algorithm: config.token.algorithm.clone(),
                access_ttl: config.token.access_token_ttl,
                refresh_ttl: config.token.refresh_token_ttl,
                issuer: config.name.clone(),
            },
            Arc::clone(&clock),
        )?);

        Ok(Self {
            register: Arc::new(RegisterUseCase::new(
                Arc::clone(&repo),
                Arc::clone(&hasher),
                Arc::clone(&telemetry),
                Arc::clone(&clock),
            )),
            login: Arc::new(LoginUseCase::new(
                Arc::clone(&repo),
                Arc::clone(&hasher),
                Arc::clone(&token),
                Arc::clone(&telemetry),
            )?),
            refresh: Arc::new(RefreshTokenUseCase::new(
                Arc::clone(&repo),
                Arc::clone(&token),
                Arc::clone(&telemetry),
            )),
            account: Arc::new(AccountUseCase::new(
                repo, hasher, telemetry, clock,
            )),
            token,
            config,
            metrics: None,
        })
    }

    /// Serve `GET /metrics` from this Prometheus recorder.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Initialize the application state.
///
/// Uses PostgreSQL when configured, an in-memory store otherwise.
pub async fn initialize_state(
    config: Configuration,
) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    let repo: Arc<dyn UserRepository> = match &config.postgres {
        Some(postgres) => {
            Arc::new(PgUserRepository::new(database::connect(postgres).await?))
        },
        None => {
            tracing::warn!(
                "missing `postgres` entry on `config.yaml` file, users are \
                 kept in memory and lost on restart"
            );
            Arc::new(InMemoryUserRepository::new())
        },
    };

    Ok(AppState::new(Arc::new(config), repo, Arc::new(SystemClock::new()))?)
}

fn cors(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .vary([header::AUTHORIZATION]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            },
        })
        .collect::<Vec<_>>();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(
                    |chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                        tracing::trace!(
                            size_bytes = chunk.len(),
                            latency = ?latency,
                            "sending body chunk"
                        )
                    },
                )
                .make_span_with(
                    DefaultMakeSpan::new()
                        .include_headers(true)
                        .level(tracing::Level::INFO),
                )
                .on_request(DefaultOnRequest::new())
                .on_response(
                    DefaultOnResponse::new()
                        .include_headers(true)
                        .latency_unit(LatencyUnit::Micros),
                ),
        )
        // Set a timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        // Add CORS preflight support.
        .layer(cors(&state.config.cors_origins));

    let api = Router::new()
        .nest("/auth", router::auth::router(state.clone()))
        .nest("/users", router::users::router(state.clone()));

    let prefix = state.config.api_prefix.trim_end_matches('/');
    let routes = Router::new()
        // `GET /health` goes to `health`.
        .route("/health", get(router::status::health))
        // `GET /metrics` goes to `metrics`.
        .route("/metrics", get(router::status::metrics));
    let routes = if prefix.is_empty() {
        routes.merge(api)
    } else {
        routes.nest(prefix, api)
    };

    routes
        .with_state(state)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    body: String,
    token: Option<&str>,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request =
            request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    app.oneshot(request.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// State over an empty in-memory store, with cheap hashing.
#[cfg(test)]
pub fn test_state() -> AppState {
    let mut config = Configuration::default();
    config.token.secret_key =
        zeroize::Zeroizing::new("test-secret-with-at-least-32-bytes!!".into());
    config.argon2 = Some(crate::config::Argon2 {
        memory_cost: 1024,
        iterations: 1,
        parallelism: 1,
    });

    AppState::new(
        Arc::new(config),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(SystemClock::new()),
    )
    .unwrap()
}

/// Read a JSON response body.
#[cfg(test)]
pub async fn json_body<T: serde::de::DeserializeOwned>(
    response: axum::http::Response<axum::body::Body>,
) -> T {
    use http_body_util::BodyExt;

    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
