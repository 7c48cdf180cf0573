use async_trait::async_trait;

use super::OrgEvent;

/// Receives every dispatched event; match on the variants you care about.
///
/// ```rust,ignore
/// use orgbook::events::{Listener, OrgEvent};
///
/// struct DuplicateAlert;
///
/// #[async_trait::async_trait]
/// impl Listener for DuplicateAlert {
///     async fn handle(&self, event: &OrgEvent) {
///         if let OrgEvent::DuplicateContactBlocked { email, .. } = event {
///             // notify the data quality channel
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    async fn handle(&self, event: &OrgEvent);
}
