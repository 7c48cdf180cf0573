//! HTTP handlers, one module per resource.

pub(super) mod contacts;
pub(super) mod members;
pub(super) mod organizations;
pub(super) mod session;
pub(super) mod users;
