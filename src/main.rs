use dhakacart_auth::config::Configuration;
use dhakacart_auth::telemetry::{setup_metrics_recorder, setup_tracing};
use dhakacart_auth::{app, initialize_state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // `.env` is optional.
    dotenvy::dotenv().ok();

    let config = Configuration::default().read()?;
    setup_tracing(config.environment);
    if let Some(reason) = config.fallback() {
        tracing::warn!(
            error = %reason,
            path = %config.file_path().display(),
            "configuration file not found, using defaults"
        );
    }
    config.validate().inspect_err(|err| {
        tracing::error!(error = %err, "invalid configuration");
    })?;

    let address = config.address.clone();
    tracing::info!(
        environment = ?config.environment,
        prefix = %config.api_prefix,
        "configuration loaded"
    );

    let mut state = initialize_state(config).await?;
    match setup_metrics_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(err) => {
            tracing::warn!(error = %err, "prometheus recorder not installed")
        },
    }

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "server listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            },
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
