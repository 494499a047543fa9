//! Interface for observability.

/// Port for telemetry/observability operations.
pub trait TelemetryPort: Send + Sync {
    /// Record a successful authentication.
    fn record_auth_success(&self, user_id: &str, method: &str);

    /// Record a failed authentication attempt.
    fn record_auth_failure(&self, reason: &str);

    /// Record a new account creation.
    fn record_account_created(&self, user_id: &str);

    /// Record a state change on an existing account.
    fn record_account_updated(&self, user_id: &str, change: &str);
}
