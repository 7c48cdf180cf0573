//! Embedded `SQLite` migrations.
//!
//! ```rust,ignore
//! use orgbook::sqlite::{connect, migrations};
//!
//! let pool = connect("sqlite://orgbook.db").await?;
//! migrations::run(&pool).await?;
//! ```

use sqlx::{Executor, SqlitePool};

/// Users, organizations and memberships.
const CORE_MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250101000001_create_users_table",
        include_str!("../../migrations_sqlite/core/20250101000001_create_users_table.sql"),
    ),
    (
        "20250101000002_create_organizations_table",
        include_str!("../../migrations_sqlite/core/20250101000002_create_organizations_table.sql"),
    ),
    (
        "20250101000003_create_organization_user_table",
        include_str!(
            "../../migrations_sqlite/core/20250101000003_create_organization_user_table.sql"
        ),
    ),
];

/// Contacts and their notes and custom fields.
const CONTACT_MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250101000004_create_contacts_table",
        include_str!("../../migrations_sqlite/contacts/20250101000004_create_contacts_table.sql"),
    ),
    (
        "20250101000005_create_contact_notes_table",
        include_str!(
            "../../migrations_sqlite/contacts/20250101000005_create_contact_notes_table.sql"
        ),
    ),
    (
        "20250101000006_create_contact_meta_table",
        include_str!(
            "../../migrations_sqlite/contacts/20250101000006_create_contact_meta_table.sql"
        ),
    ),
];

/// Applies every pending migration, tracked in `_orgbook_migrations`.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _orgbook_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    run_migrations(pool, CORE_MIGRATIONS).await?;
    run_migrations(pool, CONTACT_MIGRATIONS).await?;

    Ok(())
}

/// Statements are split on `;`, so migration files must not contain
/// semicolons inside string literals.
async fn run_migrations(pool: &SqlitePool, migrations: &[(&str, &str)]) -> Result<(), sqlx::Error> {
    for (name, sql) in migrations {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _orgbook_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;

        if applied {
            continue;
        }

        let mut tx = pool.begin().await?;
        for statement in sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                (&mut *tx).execute(trimmed).await?;
            }
        }
        sqlx::query("INSERT INTO _orgbook_migrations (name) VALUES (?)")
            .bind(*name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        log::info!(target: "orgbook", "msg=\"migration applied\", name=\"{name}\"");
    }
    Ok(())
}
