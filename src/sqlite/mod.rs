//! `SQLite` repositories.
//!
//! Enable the `sqlx_sqlite` feature to use these implementations.

mod contact;
mod membership;
pub mod migrations;
mod organization;
mod user;

use std::str::FromStr;

pub use contact::SqliteContactRepository;
pub use membership::SqliteMembershipRepository;
pub use organization::SqliteOrganizationRepository;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
pub use user::SqliteUserRepository;

use crate::OrgbookError;

/// Opens a pool with foreign keys enabled on every connection, creating the
/// database file if needed.
///
/// An in-memory database lives only as long as its connection, so
/// `sqlite::memory:` URLs get a single connection that is never recycled.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options.connect_with(options).await
}

/// Creates every repository from one pool.
pub fn create_repositories(
    pool: SqlitePool,
) -> (
    SqliteUserRepository,
    SqliteOrganizationRepository,
    SqliteMembershipRepository,
    SqliteContactRepository,
) {
    (
        SqliteUserRepository::new(pool.clone()),
        SqliteOrganizationRepository::new(pool.clone()),
        SqliteMembershipRepository::new(pool.clone()),
        SqliteContactRepository::new(pool),
    )
}

/// Logs a database failure and converts it.
fn db_error(operation: &str, e: &sqlx::Error) -> OrgbookError {
    log::error!(
        target: "orgbook",
        "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
    );
    OrgbookError::DatabaseError(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
