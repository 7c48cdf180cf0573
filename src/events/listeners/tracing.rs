use async_trait::async_trait;

use crate::events::{Listener, OrgEvent};

/// Emits every event as a `tracing` event under `orgbook::events`.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &OrgEvent) {
        tracing::info!(
            target: "orgbook::events",
            event_name = event.name(),
            organization_id = event.organization_id().map(|id| id.get()),
            ?event,
            "domain event"
        );
    }
}
