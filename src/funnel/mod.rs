//! Conversation funnel: the stateful core.
//!
//! State lives only in the user's profile row; `FunnelStep` is its projection.

pub mod engine;
pub mod outcome;
pub mod state;

pub use engine::{FunnelDeps, FunnelEngine};
pub use outcome::{Outcome, PendingReservation};
pub use state::FunnelStep;
