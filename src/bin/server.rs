//! `orgbook-server`: the HTTP API on `SQLite`.
//!
//! Environment (a `.env` file is read when present):
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `sqlite://orgbook.db` |
//! | `ORGBOOK_BIND` | `127.0.0.1:8080` |
//! | `ORGBOOK_SESSION_DIR` | unset: sessions kept in memory |
//! | `ORGBOOK_CORS_ORIGINS` | unset: no CORS layer |
//! | `RUST_LOG` | `info` |
//!
//! plus the `ORGBOOK_*` variables read by `OrgbookConfig::from_env`.

use std::sync::Arc;
use std::time::Duration;

use orgbook::api::axum::{AppState, default_cors, routes};
use orgbook::events::listeners::LoggingListener;
use orgbook::session::{FileSessionRepository, InMemorySessionRepository, SessionRepository};
use orgbook::sqlite::{connect, create_repositories, migrations};
use orgbook::storage::LocalAvatarStorage;
use orgbook::{OrgbookConfig, register_event_listeners};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const PRUNE_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // installs the log bridge as well, so `log` records show up
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    register_event_listeners(|registry| {
        registry.listen(LoggingListener::new());
        #[cfg(feature = "tracing")]
        registry.listen(orgbook::events::listeners::TracingListener);
    });

    let config = OrgbookConfig::from_env()?;
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://orgbook.db".to_owned());
    let bind = std::env::var("ORGBOOK_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_owned());

    let pool = connect(&database_url).await?;
    migrations::run(&pool).await?;

    match std::env::var("ORGBOOK_SESSION_DIR") {
        Ok(dir) => serve(config, pool, FileSessionRepository::new(dir)?, &bind).await,
        Err(_) => serve(config, pool, InMemorySessionRepository::new(), &bind).await,
    }
}

async fn serve<S>(
    config: OrgbookConfig,
    pool: sqlx::SqlitePool,
    sessions: S,
    bind: &str,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: SessionRepository + Clone + 'static,
{
    let (users, organizations, memberships, contacts) = create_repositories(pool);
    let avatar_storage = LocalAvatarStorage::from_config(&config.storage);

    let pruner = sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            match pruner.prune_expired().await {
                Ok(0) => {}
                Ok(removed) => {
                    log::info!(target: "orgbook::session", "msg=\"expired sessions pruned\", removed={removed}");
                }
                Err(e) => {
                    log::warn!(target: "orgbook::session", "msg=\"session pruning failed\", error=\"{e}\"");
                }
            }
        }
    });

    let state = AppState {
        user_repository: users,
        organization_repository: organizations,
        membership_repository: memberships,
        contact_repository: contacts,
        session_repository: sessions,
        avatar_storage,
        config: Arc::new(config),
    };

    let mut app = routes().with_state(state);
    if let Ok(origins) = std::env::var("ORGBOOK_CORS_ORIGINS") {
        let origins: Vec<&str> = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .collect();
        app = app.layer(default_cors(&origins));
    }

    let listener = TcpListener::bind(bind).await?;
    log::info!(target: "orgbook", "msg=\"listening\", addr=\"{bind}\"");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            log::info!(target: "orgbook", "msg=\"shutting down\"");
        })
        .await?;

    Ok(())
}
