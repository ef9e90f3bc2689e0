//! Webhook transport: signed deliveries in, per-user dispatch, replies out.

pub mod dispatch;
pub mod routes;
pub mod signature;
pub mod types;

pub use dispatch::{DispatchSummary, Dispatcher};
pub use routes::{WebhookState, webhook_routes};
pub use types::{WebhookBody, WebhookEvent};
