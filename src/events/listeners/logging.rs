use async_trait::async_trait;

use crate::events::{Listener, OrgEvent};

/// Writes every event to the `log` facade under `orgbook::events`.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Logs at `Info`.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &OrgEvent) {
        // blocked duplicates are worth a look even when info is filtered out
        let level = match event {
            OrgEvent::DuplicateContactBlocked { .. } | OrgEvent::LoginFailed { .. } => {
                self.level.min(log::Level::Warn)
            }
            _ => self.level,
        };
        log::log!(
            target: "orgbook::events",
            level,
            "event={} organization_id={} {:?}",
            event.name(),
            event.organization_id().map_or_else(|| "-".to_owned(), |id| id.to_string()),
            event
        );
    }
}
