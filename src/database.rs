//! PostgreSQL connection.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::Postgres;

pub const DEFAULT_CREDENTIALS: &str = "postgres";
pub const DEFAULT_DATABASE_NAME: &str = "dhakacart";
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Open a connection pool and bring the schema up to date.
pub async fn connect(config: &Postgres) -> Result<PgPool, sqlx::Error> {
    let username = config.username.as_deref().unwrap_or(DEFAULT_CREDENTIALS);
    let password = config.password.as_deref().unwrap_or(DEFAULT_CREDENTIALS);
    let database = config.database.as_deref().unwrap_or(DEFAULT_DATABASE_NAME);

    let addr = format!(
        "postgres://{username}:{password}@{}/{database}",
        config.address
    );
    let pool = PgPoolOptions::new()
        .max_connections(config.pool_size.unwrap_or(DEFAULT_POOL_SIZE))
        .connect(&addr)
        .await?;

    tracing::info!(hostname = %config.address, db = %database, "postgres connected");

    // execute migrations scripts on start.
    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}
