//! Estate bot: LINE webhook chatbot for browsing listings, capturing leads,
//! and booking viewings.

pub mod channels;
pub mod config;
pub mod error;
pub mod funnel;
pub mod intent;
pub mod reply;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod webhook;
