//! Reply channel: the messaging platform seen from the bot.

pub mod line;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ChannelError;
use crate::reply::Message;

pub use line::LineClient;

/// A user's public profile as reported by the platform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformProfile {
    pub display_name: String,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// Outbound operations against the messaging platform.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Answer the event that issued `reply_token`. Tokens are single-use.
    async fn reply_message(
        &self,
        reply_token: &str,
        messages: &[Message],
    ) -> Result<(), ChannelError>;

    /// Send messages unprompted to a user or group id.
    async fn push_message(&self, to: &str, messages: &[Message]) -> Result<(), ChannelError>;

    /// Attach a provisioned rich menu to one user.
    async fn link_rich_menu(&self, user_id: &str, rich_menu_id: &str)
    -> Result<(), ChannelError>;

    async fn get_profile(&self, user_id: &str) -> Result<PlatformProfile, ChannelError>;
}
