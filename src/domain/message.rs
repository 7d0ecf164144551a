//! Outgoing robot messages.
//!
//! On the wire a message is `{"msgtype": "<kind>", "<kind>": {...}}`. The
//! payload lives inside the [`Message`] variant, so a value always carries
//! exactly the payload its discriminator names. Incoming JSON goes through
//! [`WireMessage`], which keeps the sibling-optional layout and is checked
//! when converted.

use crate::utils::error::{HookError, Result};
use crate::utils::validation::{validate_link, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "markdown")]
    Markdown,
    #[serde(rename = "link")]
    Link,
    #[serde(rename = "actionCard")]
    ActionCard,
}

impl MessageKind {
    pub const ALL: [MessageKind; 4] = [
        MessageKind::Text,
        MessageKind::Markdown,
        MessageKind::Link,
        MessageKind::ActionCard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Markdown => "markdown",
            MessageKind::Link => "link",
            MessageKind::ActionCard => "actionCard",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| HookError::MessageConformanceError {
                kind: s.to_string(),
                reason: "unknown msgtype".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markdown {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub title: String,
    #[serde(rename = "picUrl", default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(rename = "messageUrl")]
    pub message_url: String,
}

impl Link {
    pub fn with_picture_url(mut self, url: impl Into<String>) -> Self {
        self.picture_url = Some(url.into());
        self
    }
}

/// `hideAvatar` is a string flag on the wire: `"0"` shows the sender avatar, `"1"` hides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarVisibility {
    #[serde(rename = "0")]
    Show,
    #[serde(rename = "1")]
    Hide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub title: String,
    #[serde(rename = "actionURL")]
    pub action_url: String,
}

impl ActionButton {
    pub fn new(title: impl Into<String>, action_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            action_url: action_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCard {
    pub text: String,
    pub title: String,
    #[serde(rename = "hideAvatar", default, skip_serializing_if = "Option::is_none")]
    pub hide_avatar: Option<AvatarVisibility>,
    #[serde(rename = "btnOrientation", default, skip_serializing_if = "Option::is_none")]
    pub button_orientation: Option<String>,
    /// Rendered in order.
    #[serde(rename = "btns", default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ActionButton>>,
}

impl ActionCard {
    pub fn hide_avatar(mut self) -> Self {
        self.hide_avatar = Some(AvatarVisibility::Hide);
        self
    }

    pub fn with_button_orientation(mut self, orientation: impl Into<String>) -> Self {
        self.button_orientation = Some(orientation.into());
        self
    }

    pub fn with_button(mut self, button: ActionButton) -> Self {
        self.buttons.get_or_insert_with(Vec::new).push(button);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireMessage", into = "WireMessage")]
pub enum Message {
    Text(Text),
    Markdown(Markdown),
    Link(Link),
    ActionCard(ActionCard),
}

impl Message {
    pub fn text(content: impl Into<String>) -> Self {
        Message::Text(Text {
            content: content.into(),
        })
    }

    pub fn markdown(title: impl Into<String>, text: impl Into<String>) -> Self {
        Message::Markdown(Markdown {
            title: title.into(),
            text: text.into(),
        })
    }

    pub fn link(
        title: impl Into<String>,
        text: impl Into<String>,
        message_url: impl Into<String>,
    ) -> Link {
        Link {
            text: text.into(),
            title: title.into(),
            picture_url: None,
            message_url: message_url.into(),
        }
    }

    pub fn action_card(title: impl Into<String>, text: impl Into<String>) -> ActionCard {
        ActionCard {
            text: text.into(),
            title: title.into(),
            hide_avatar: None,
            button_orientation: None,
            buttons: None,
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Text(_) => MessageKind::Text,
            Message::Markdown(_) => MessageKind::Markdown,
            Message::Link(_) => MessageKind::Link,
            Message::ActionCard(_) => MessageKind::ActionCard,
        }
    }

    /// Parses a request body, reporting layout problems as
    /// [`HookError::MessageConformanceError`] rather than a generic JSON error.
    pub fn from_json(body: &str) -> Result<Self> {
        let wire: WireMessage = serde_json::from_str(body)?;
        Message::try_from(wire)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<Link> for Message {
    fn from(link: Link) -> Self {
        Message::Link(link)
    }
}

impl From<ActionCard> for Message {
    fn from(card: ActionCard) -> Self {
        Message::ActionCard(card)
    }
}

/// The request body as the endpoint sees it: a discriminator plus one
/// optional sibling per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireMessage {
    pub msgtype: Option<MessageKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<Markdown>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(rename = "actionCard", default, skip_serializing_if = "Option::is_none")]
    pub action_card: Option<ActionCard>,
}

impl WireMessage {
    fn populated(&self) -> Vec<MessageKind> {
        let mut kinds = Vec::new();
        if self.text.is_some() {
            kinds.push(MessageKind::Text);
        }
        if self.markdown.is_some() {
            kinds.push(MessageKind::Markdown);
        }
        if self.link.is_some() {
            kinds.push(MessageKind::Link);
        }
        if self.action_card.is_some() {
            kinds.push(MessageKind::ActionCard);
        }
        kinds
    }
}

impl TryFrom<WireMessage> for Message {
    type Error = HookError;

    fn try_from(wire: WireMessage) -> Result<Self> {
        let kind = wire.msgtype.ok_or_else(|| HookError::MessageConformanceError {
            kind: "<missing>".to_string(),
            reason: "msgtype is required".to_string(),
        })?;

        let extra: Vec<&str> = wire
            .populated()
            .into_iter()
            .filter(|populated| *populated != kind)
            .map(|populated| populated.as_str())
            .collect();
        if !extra.is_empty() {
            return Err(HookError::MessageConformanceError {
                kind: kind.to_string(),
                reason: format!("unexpected payload(s) present: {}", extra.join(", ")),
            });
        }

        let missing = || HookError::MessageConformanceError {
            kind: kind.to_string(),
            reason: format!("'{}' payload is missing", kind),
        };

        match kind {
            MessageKind::Text => wire.text.map(Message::Text).ok_or_else(missing),
            MessageKind::Markdown => wire.markdown.map(Message::Markdown).ok_or_else(missing),
            MessageKind::Link => wire.link.map(Message::Link).ok_or_else(missing),
            MessageKind::ActionCard => {
                wire.action_card.map(Message::ActionCard).ok_or_else(missing)
            }
        }
    }
}

impl From<Message> for WireMessage {
    fn from(message: Message) -> Self {
        let mut wire = WireMessage {
            msgtype: Some(message.kind()),
            ..Default::default()
        };
        match message {
            Message::Text(text) => wire.text = Some(text),
            Message::Markdown(markdown) => wire.markdown = Some(markdown),
            Message::Link(link) => wire.link = Some(link),
            Message::ActionCard(card) => wire.action_card = Some(card),
        }
        wire
    }
}

impl Validate for Message {
    fn validate(&self) -> Result<()> {
        match self {
            Message::Text(text) => validate_non_empty_string("text.content", &text.content),
            Message::Markdown(markdown) => {
                validate_non_empty_string("markdown.title", &markdown.title)?;
                validate_non_empty_string("markdown.text", &markdown.text)
            }
            Message::Link(link) => {
                validate_non_empty_string("link.title", &link.title)?;
                validate_non_empty_string("link.text", &link.text)?;
                validate_link("link.messageUrl", &link.message_url)?;
                if let Some(picture_url) = &link.picture_url {
                    validate_link("link.picUrl", picture_url)?;
                }
                Ok(())
            }
            Message::ActionCard(card) => {
                validate_non_empty_string("actionCard.title", &card.title)?;
                validate_non_empty_string("actionCard.text", &card.text)?;
                for (idx, button) in card.buttons.iter().flatten().enumerate() {
                    validate_non_empty_string(
                        &format!("actionCard.btns[{}].title", idx),
                        &button.title,
                    )?;
                    validate_link(
                        &format!("actionCard.btns[{}].actionURL", idx),
                        &button.action_url,
                    )?;
                }
                Ok(())
            }
        }
    }
}
