//! PostgreSQL user store.

mod models;
mod user_repository;

pub use models::UserRecord;
pub use user_repository::PgUserRepository;
