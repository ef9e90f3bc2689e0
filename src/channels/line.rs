//! LINE Messaging API client.
//!
//! Thin reqwest wrapper over the reply, push, rich menu link and profile
//! endpoints. Authenticates with the channel access token as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, warn};

use crate::channels::{MessagingApi, PlatformProfile};
use crate::error::ChannelError;
use crate::reply::Message;

const LINE_API_BASE: &str = "https://api.line.me/v2/bot";

/// The platform rejects requests with more than five messages.
pub const MAX_MESSAGES_PER_REQUEST: usize = 5;

const CHANNEL_NAME: &str = "line";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyBody<'a> {
    reply_token: &'a str,
    messages: &'a [Message],
}

#[derive(Serialize)]
struct PushBody<'a> {
    to: &'a str,
    messages: &'a [Message],
}

/// LINE client: one shared `reqwest::Client` with the configured timeout.
pub struct LineClient {
    access_token: SecretString,
    api_base: String,
    client: reqwest::Client,
}

impl LineClient {
    pub fn new(access_token: SecretString, timeout: Duration) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChannelError::Http(e.to_string()))?;
        Ok(Self {
            access_token,
            api_base: LINE_API_BASE.to_string(),
            client,
        })
    }

    /// Point the client at another host (a local stub, a proxy).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base)
    }

    async fn check(resp: reqwest::Response, op: &str) -> Result<reqwest::Response, ChannelError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(status_error(status, op, &body))
    }
}

/// Map a non-success status to a channel error.
fn status_error(status: StatusCode, op: &str, body: &str) -> ChannelError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChannelError::AuthFailed {
            name: CHANNEL_NAME.into(),
            reason: format!("{op} returned {status}: {body}"),
        },
        StatusCode::TOO_MANY_REQUESTS => ChannelError::RateLimited {
            name: CHANNEL_NAME.into(),
        },
        _ => ChannelError::SendFailed {
            name: CHANNEL_NAME.into(),
            reason: format!("{op} returned {status}: {body}"),
        },
    }
}

/// Clamp a batch to the per-request limit, logging what gets dropped.
fn clamp_messages<'a>(messages: &'a [Message], op: &str) -> &'a [Message] {
    if messages.len() > MAX_MESSAGES_PER_REQUEST {
        warn!(
            op,
            count = messages.len(),
            "Too many messages for one request, extra messages dropped"
        );
        &messages[..MAX_MESSAGES_PER_REQUEST]
    } else {
        messages
    }
}

fn send_error(e: reqwest::Error) -> ChannelError {
    ChannelError::SendFailed {
        name: CHANNEL_NAME.into(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl MessagingApi for LineClient {
    async fn reply_message(
        &self,
        reply_token: &str,
        messages: &[Message],
    ) -> Result<(), ChannelError> {
        if messages.is_empty() {
            return Ok(());
        }
        let body = ReplyBody {
            reply_token,
            messages: clamp_messages(messages, "reply"),
        };
        let resp = self
            .client
            .post(self.api_url("message/reply"))
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;
        Self::check(resp, "reply").await?;
        debug!(count = body.messages.len(), "Reply sent");
        Ok(())
    }

    async fn push_message(&self, to: &str, messages: &[Message]) -> Result<(), ChannelError> {
        if messages.is_empty() {
            return Ok(());
        }
        let body = PushBody {
            to,
            messages: clamp_messages(messages, "push"),
        };
        let resp = self
            .client
            .post(self.api_url("message/push"))
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;
        Self::check(resp, "push").await?;
        debug!(to, count = body.messages.len(), "Push sent");
        Ok(())
    }

    async fn link_rich_menu(
        &self,
        user_id: &str,
        rich_menu_id: &str,
    ) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(self.api_url(&format!("user/{user_id}/richmenu/{rich_menu_id}")))
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(send_error)?;
        Self::check(resp, "link_rich_menu").await?;
        debug!(user_id, rich_menu_id, "Rich menu linked");
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<PlatformProfile, ChannelError> {
        let resp = self
            .client
            .get(self.api_url(&format!("profile/{user_id}")))
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(send_error)?;
        let resp = Self::check(resp, "get_profile").await?;
        resp.json::<PlatformProfile>()
            .await
            .map_err(|e| ChannelError::InvalidResponse {
                name: CHANNEL_NAME.into(),
                reason: e.to_string(),
            })
    }
}
