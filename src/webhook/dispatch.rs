//! Batch dispatcher: one delivery in, one reply per handled event out.
//!
//! Events are grouped by user. Each group runs on its own task and handles
//! its events in delivery order, so two events from the same user never race
//! on that user's profile. Groups run concurrently.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{Instrument, debug, error, info_span, warn};

use crate::channels::MessagingApi;
use crate::error::WebhookError;
use crate::funnel::{FunnelEngine, Outcome};
use crate::intent::{self, Event, TextClassifier};
use crate::reply::{self, ReplyContext};

/// Counts for one processed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub users: usize,
    pub events: usize,
}

#[derive(Clone)]
pub struct Dispatcher {
    engine: FunnelEngine,
    classifier: Arc<TextClassifier>,
    messaging: Arc<dyn MessagingApi>,
    reply_ctx: Arc<ReplyContext>,
}

impl Dispatcher {
    pub fn new(
        engine: FunnelEngine,
        classifier: Arc<TextClassifier>,
        messaging: Arc<dyn MessagingApi>,
        reply_ctx: Arc<ReplyContext>,
    ) -> Self {
        Self {
            engine,
            classifier,
            messaging,
            reply_ctx,
        }
    }

    /// Process a whole delivery. Fails only when a group task dies; every
    /// other failure is handled per event.
    pub async fn dispatch(&self, events: Vec<Event>) -> Result<DispatchSummary, WebhookError> {
        let total = events.len();
        let groups = group_by_user(events);
        let users = groups.len();

        let mut user_ids = Vec::with_capacity(users);
        let mut handles = Vec::with_capacity(users);
        for (user_id, events) in groups {
            let this = self.clone();
            let span = info_span!("user", user_id = %user_id);
            user_ids.push(user_id);
            handles.push(tokio::spawn(
                async move {
                    for event in events {
                        this.process(event).await;
                    }
                }
                .instrument(span),
            ));
        }

        let mut failure = None;
        for (user_id, result) in user_ids.into_iter().zip(join_all(handles).await) {
            if let Err(e) = result {
                error!(user_id = %user_id, error = %e, "Event task failed");
                failure.get_or_insert(WebhookError::TaskFailed {
                    user_id,
                    reason: e.to_string(),
                });
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(DispatchSummary {
                users,
                events: total,
            }),
        }
    }

    /// Classify, run the funnel, and reply for a single event.
    pub async fn process(&self, event: Event) -> Outcome {
        let intent = intent::classify(&event.kind, &self.classifier);
        let intent_name = intent.name();

        let outcome = match self.engine.handle(&event.user_id, intent).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(intent = intent_name, error = %e, "Store error while handling event");
                Outcome::StoreFailure
            }
        };
        debug!(intent = intent_name, outcome = outcome.name(), "Event handled");

        let messages = reply::synthesize(&outcome, &self.reply_ctx);
        if messages.is_empty() {
            return outcome;
        }
        match event.reply_token.as_deref() {
            Some(token) => {
                if let Err(e) = self.messaging.reply_message(token, &messages).await {
                    warn!(outcome = outcome.name(), error = %e, "Reply failed");
                }
            }
            None => warn!(outcome = outcome.name(), "No reply token, reply dropped"),
        }
        outcome
    }
}

/// Group events by user id. Groups keep first-appearance order and each
/// group keeps delivery order.
pub fn group_by_user(events: Vec<Event>) -> Vec<(String, Vec<Event>)> {
    let mut groups: Vec<(String, Vec<Event>)> = Vec::new();
    for event in events {
        match groups.iter_mut().find(|(id, _)| *id == event.user_id) {
            Some((_, group)) => group.push(event),
            None => groups.push((event.user_id.clone(), vec![event])),
        }
    }
    groups
}
