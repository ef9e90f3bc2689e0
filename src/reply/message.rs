//! Outbound message shapes, serialized exactly as the Messaging API expects.

use serde::{Deserialize, Serialize};

/// A single outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    Text {
        text: String,
        #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none", default)]
        quick_reply: Option<QuickReply>,
    },
    /// Free-form flex bubble or carousel; the layout is opaque JSON.
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        contents: serde_json::Value,
    },
    Template {
        #[serde(rename = "altText")]
        alt_text: String,
        template: Template,
    },
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            quick_reply: None,
        }
    }

    pub fn text_with_quick_reply(text: impl Into<String>, actions: Vec<Action>) -> Self {
        Self::Text {
            text: text.into(),
            quick_reply: Some(QuickReply::new(actions)),
        }
    }

    pub fn flex(alt_text: impl Into<String>, contents: serde_json::Value) -> Self {
        Self::Flex {
            alt_text: alt_text.into(),
            contents,
        }
    }

    /// The plain text body, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

impl QuickReply {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            items: actions
                .into_iter()
                .map(|action| QuickReplyItem::Action { action })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QuickReplyItem {
    Action { action: Action },
}

/// A tappable action attached to a button, column, or quick reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Postback {
        label: String,
        data: String,
        #[serde(rename = "displayText", skip_serializing_if = "Option::is_none", default)]
        display_text: Option<String>,
    },
    Message {
        label: String,
        text: String,
    },
    Uri {
        label: String,
        uri: String,
    },
}

impl Action {
    pub fn postback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Postback {
            label: label.into(),
            data: data.into(),
            display_text: None,
        }
    }

    /// Postback that also echoes `label` into the chat as the user's message.
    pub fn postback_echo(label: impl Into<String>, data: impl Into<String>) -> Self {
        let label = label.into();
        Self::Postback {
            display_text: Some(label.clone()),
            label,
            data: data.into(),
        }
    }

    pub fn message(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Message {
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn uri(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::Uri {
            label: label.into(),
            uri: uri.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Postback { label, .. } | Self::Message { label, .. } | Self::Uri { label, .. } => {
                label
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Template {
    Buttons {
        #[serde(rename = "thumbnailImageUrl", skip_serializing_if = "Option::is_none", default)]
        thumbnail_image_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        title: Option<String>,
        text: String,
        actions: Vec<Action>,
    },
    Carousel {
        columns: Vec<CarouselColumn>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselColumn {
    #[serde(rename = "thumbnailImageUrl", skip_serializing_if = "Option::is_none", default)]
    pub thumbnail_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    pub text: String,
    pub actions: Vec<Action>,
}
