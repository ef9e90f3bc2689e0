//! In-process doubles for the platform and catalog seams.
//!
//! Compiled for unit tests and, behind the `testing` feature, for the router
//! integration tests: `cargo test --features testing`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::channels::{MessagingApi, PlatformProfile};
use crate::error::{ChannelError, DatabaseError};
use crate::reply::Message;
use crate::store::{AdminContact, Listing, ListingCatalog, ListingQuery};

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Reply {
        reply_token: String,
        messages: Vec<Message>,
    },
    Push {
        to: String,
        messages: Vec<Message>,
    },
    LinkRichMenu {
        user_id: String,
        rich_menu_id: String,
    },
}

/// A `MessagingApi` that records every call instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    display_name: Option<String>,
    fail_profiles: AtomicBool,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile lookups answer with this display name.
    pub fn with_display_name(name: &str) -> Self {
        Self {
            display_name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Make every later profile lookup fail.
    pub fn fail_profile_lookups(&self) {
        self.fail_profiles.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.lock().clone()
    }

    /// Replies only, in send order.
    pub fn replies(&self) -> Vec<(String, Vec<Message>)> {
        self.lock()
            .iter()
            .filter_map(|s| match s {
                Sent::Reply {
                    reply_token,
                    messages,
                } => Some((reply_token.clone(), messages.clone())),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Sent>> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MessagingApi for RecordingMessenger {
    async fn reply_message(
        &self,
        reply_token: &str,
        messages: &[Message],
    ) -> Result<(), ChannelError> {
        self.lock().push(Sent::Reply {
            reply_token: reply_token.to_string(),
            messages: messages.to_vec(),
        });
        Ok(())
    }

    async fn push_message(&self, to: &str, messages: &[Message]) -> Result<(), ChannelError> {
        self.lock().push(Sent::Push {
            to: to.to_string(),
            messages: messages.to_vec(),
        });
        Ok(())
    }

    async fn link_rich_menu(
        &self,
        user_id: &str,
        rich_menu_id: &str,
    ) -> Result<(), ChannelError> {
        self.lock().push(Sent::LinkRichMenu {
            user_id: user_id.to_string(),
            rich_menu_id: rich_menu_id.to_string(),
        });
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<PlatformProfile, ChannelError> {
        if self.fail_profiles.load(Ordering::SeqCst) {
            return Err(ChannelError::InvalidResponse {
                name: "recording".into(),
                reason: format!("no profile for {user_id}"),
            });
        }
        Ok(PlatformProfile {
            display_name: self
                .display_name
                .clone()
                .unwrap_or_else(|| user_id.to_string()),
            picture_url: None,
            status_message: None,
        })
    }
}

/// Wraps a catalog and counts every call made through it.
pub struct CountingCatalog {
    inner: Arc<dyn ListingCatalog>,
    calls: AtomicUsize,
}

impl CountingCatalog {
    pub fn new(inner: Arc<dyn ListingCatalog>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ListingCatalog for CountingCatalog {
    async fn search_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, DatabaseError> {
        self.bump();
        self.inner.search_listings(query).await
    }

    async fn find_listing_by_name(&self, name: &str) -> Result<Option<Listing>, DatabaseError> {
        self.bump();
        self.inner.find_listing_by_name(name).await
    }

    async fn find_listing_matching(&self, query: &str) -> Result<Option<Listing>, DatabaseError> {
        self.bump();
        self.inner.find_listing_matching(query).await
    }

    async fn listings_by_names(&self, names: &[String]) -> Result<Vec<Listing>, DatabaseError> {
        self.bump();
        self.inner.listings_by_names(names).await
    }

    async fn list_admins(&self, limit: usize) -> Result<Vec<AdminContact>, DatabaseError> {
        self.bump();
        self.inner.list_admins(limit).await
    }
}
