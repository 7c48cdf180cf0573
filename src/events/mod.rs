//! Domain events.
//!
//! Actions fire an [`OrgEvent`] after every state change and when a
//! duplicate contact is blocked. Without registered listeners dispatching
//! does nothing.
//!
//! ```rust,ignore
//! use orgbook::register_event_listeners;
//! use orgbook::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::OrgEvent;
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, register_event_listeners};
