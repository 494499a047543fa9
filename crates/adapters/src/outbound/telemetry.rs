//! Telemetry adapters - Observability implementations.

use application::ports::outbound::TelemetryPort;

/// Tracing-based telemetry adapter, also feeding `metrics` counters.
///
/// Counters are no-ops until a recorder is installed.
#[derive(Debug, Default)]
pub struct TracingTelemetry;

impl TracingTelemetry {
    /// Create a new [`TracingTelemetry`].
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryPort for TracingTelemetry {
    fn record_auth_success(&self, user_id: &str, method: &str) {
        tracing::info!(user_id, method, "authentication successful");
        metrics::counter!("auth_success_total", "method" => method.to_owned())
            .increment(1);
    }

    fn record_auth_failure(&self, reason: &str) {
        tracing::info!(reason, "authentication failed");
        metrics::counter!("auth_failure_total", "reason" => reason.to_owned())
            .increment(1);
    }

    fn record_account_created(&self, user_id: &str) {
        tracing::info!(user_id, "account created");
        metrics::counter!("accounts_created_total").increment(1);
    }

    fn record_account_updated(&self, user_id: &str, change: &str) {
        tracing::info!(user_id, change, "account updated");
        metrics::counter!("account_updates_total", "change" => change.to_owned())
            .increment(1);
    }
}
