//! Inbound webhook payload as delivered by the platform.

use serde::Deserialize;

use crate::error::WebhookError;
use crate::intent::{Event, EventKind};

/// One delivery: an ordered batch of events.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

impl WebhookBody {
    /// Decode a raw delivery body.
    pub fn from_slice(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostbackContent {
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text {
        text: String,
    },
    /// Images, stickers, locations and the rest.
    #[serde(other)]
    Other,
}

/// A single wire event. Types the bot does not handle decode as `Unsupported`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message {
        source: EventSource,
        #[serde(rename = "replyToken", default)]
        reply_token: Option<String>,
        message: MessageContent,
    },
    Postback {
        source: EventSource,
        #[serde(rename = "replyToken", default)]
        reply_token: Option<String>,
        postback: PostbackContent,
    },
    Follow {
        source: EventSource,
        #[serde(rename = "replyToken", default)]
        reply_token: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

impl WebhookEvent {
    /// Reduce to a domain event. `None` for unsupported types, non-text
    /// messages, and events without a user id.
    pub fn into_event(self) -> Option<Event> {
        let (source, reply_token, kind) = match self {
            Self::Message {
                source,
                reply_token,
                message: MessageContent::Text { text },
            } => (source, reply_token, EventKind::Text { text }),
            Self::Postback {
                source,
                reply_token,
                postback,
            } => (
                source,
                reply_token,
                EventKind::Postback {
                    data: postback.data,
                },
            ),
            Self::Follow {
                source,
                reply_token,
            } => (source, reply_token, EventKind::Follow),
            Self::Message { .. } | Self::Unsupported => return None,
        };
        let user_id = source.user_id.filter(|id| !id.is_empty())?;
        Some(Event {
            user_id,
            reply_token,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Vec<Option<Event>> {
        let body: WebhookBody = serde_json::from_str(json).unwrap();
        body.events.into_iter().map(WebhookEvent::into_event).collect()
    }

    #[test]
    fn decodes_the_three_handled_kinds() {
        let events = decode(
            r#"{
                "destination": "Ubot",
                "events": [
                    {"type": "message", "replyToken": "r1", "source": {"type": "user", "userId": "U1"},
                     "message": {"type": "text", "id": "1", "text": "สนใจ Baan Suan"}},
                    {"type": "postback", "replyToken": "r2", "source": {"type": "user", "userId": "U1"},
                     "postback": {"data": "action=reservation_menu"}},
                    {"type": "follow", "replyToken": "r3", "source": {"type": "user", "userId": "U2"}}
                ]
            }"#,
        );
        assert_eq!(
            events[0],
            Some(Event {
                user_id: "U1".into(),
                reply_token: Some("r1".into()),
                kind: EventKind::Text {
                    text: "สนใจ Baan Suan".into()
                }
            })
        );
        assert!(matches!(
            &events[1],
            Some(Event { kind: EventKind::Postback { data }, .. }) if data == "action=reservation_menu"
        ));
        assert!(matches!(
            &events[2],
            Some(Event { kind: EventKind::Follow, user_id, .. }) if user_id == "U2"
        ));
    }

    #[test]
    fn unsupported_events_are_dropped() {
        let events = decode(
            r#"{"events": [
                {"type": "unfollow", "source": {"type": "user", "userId": "U1"}},
                {"type": "message", "replyToken": "r", "source": {"userId": "U1"},
                 "message": {"type": "sticker", "packageId": "1", "stickerId": "2"}},
                {"type": "follow", "replyToken": "r", "source": {"type": "group", "groupId": "G1"}}
            ]}"#,
        );
        assert_eq!(events, vec![None, None, None]);
    }

    #[test]
    fn undecodable_body_is_invalid_payload() {
        assert!(matches!(
            WebhookBody::from_slice(b"not json"),
            Err(WebhookError::InvalidPayload(_))
        ));
        assert!(matches!(
            WebhookBody::from_slice(br#"{"events": [{"type": "follow"}]}"#),
            Err(WebhookError::InvalidPayload(_))
        ));
    }

    #[test]
    fn empty_delivery_is_valid() {
        let body: WebhookBody = serde_json::from_str(r#"{"destination": "U", "events": []}"#).unwrap();
        assert!(body.events.is_empty());
    }
}
