//! Inbound events.
//!
//! A transport decodes whatever its platform sends into one [`Event`] variant
//! up front; nothing downstream inspects raw payloads again. Unknown platform
//! events travel as [`Event::Other`] with their payload untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One event from the transport's inbound stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The transport finished connecting.
    Connected,
    /// A chat message.
    Message(MessageEvent),
    /// A recoverable transport error.
    Error { description: String },
    /// The platform rejected the bot's credentials.
    InvalidAuth,
    /// Anything else, kept as the platform delivered it.
    Other {
        kind: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

/// Tags decoded into a dedicated variant; any other tag becomes `Other`.
const KNOWN_KINDS: &[&str] = &["connected", "message", "error", "invalid_auth", "other"];

impl Event {
    /// Decode a JSON event as a transport received it.
    ///
    /// A `type` this crate has no variant for is kept as [`Event::Other`]
    /// with the whole object as payload. Known types must be well formed.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        match value.get("type").and_then(serde_json::Value::as_str) {
            Some(kind) if !KNOWN_KINDS.contains(&kind) => Ok(Self::Other {
                kind: kind.to_string(),
                payload: value,
            }),
            _ => serde_json::from_value(value),
        }
    }

    /// Short label used for logging and metrics.
    pub fn kind(&self) -> &str {
        match self {
            Self::Connected => "connected",
            Self::Message(_) => "message",
            Self::Error { .. } => "error",
            Self::InvalidAuth => "invalid_auth",
            Self::Other { .. } => "other",
        }
    }
}

/// A chat message as delivered by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Channel the message was posted in.
    pub channel: String,
    /// Sender's user id. Empty for some system messages.
    #[serde(default)]
    pub user: String,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// Set when the message was posted by an integration or bot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl MessageEvent {
    /// Plain text message from `user` in `channel`.
    pub fn new(channel: impl Into<String>, user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            user: user.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Attach a rich attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Mark the message as posted by a bot integration.
    pub fn with_bot_id(mut self, bot_id: impl Into<String>) -> Self {
        self.bot_id = Some(bot_id.into());
        self
    }

    /// Pretext of the first attachment, if there is one and it is not empty.
    ///
    /// A message without attachments simply has no secondary match source.
    pub fn attachment_pretext(&self) -> Option<&str> {
        self.attachments
            .first()
            .map(|a| a.pretext.as_str())
            .filter(|p| !p.is_empty())
    }
}

/// Rich attachment on a message. Only its plain text parts are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Text shown above the attachment body.
    #[serde(default)]
    pub pretext: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub fallback: String,
}

impl Attachment {
    /// Attachment carrying only a pretext.
    pub fn pretext(pretext: impl Into<String>) -> Self {
        Self {
            pretext: pretext.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_pretext_requires_an_attachment() {
        let msg = MessageEvent::new("C1", "U1", "hi");
        assert_eq!(msg.attachment_pretext(), None);

        let msg = msg.with_attachment(Attachment::pretext("deploy prod"));
        assert_eq!(msg.attachment_pretext(), Some("deploy prod"));
    }

    #[test]
    fn empty_pretext_is_no_source() {
        let msg = MessageEvent::new("C1", "U1", "hi").with_attachment(Attachment::default());
        assert_eq!(msg.attachment_pretext(), None);
    }

    #[test]
    fn only_first_attachment_counts() {
        let msg = MessageEvent::new("C1", "U1", "hi")
            .with_attachment(Attachment::default())
            .with_attachment(Attachment::pretext("second"));
        assert_eq!(msg.attachment_pretext(), None);
    }

    #[test]
    fn decode_tagged_message() {
        let json = r#"{"type":"message","channel":"D1","user":"U2","text":"ping"}"#;
        let event: Event = serde_json::from_str(json).expect("valid event");
        assert_eq!(event, Event::Message(MessageEvent::new("D1", "U2", "ping")));
        assert_eq!(event.kind(), "message");
    }

    #[test]
    fn decode_unit_and_other_events() {
        let event: Event = serde_json::from_str(r#"{"type":"invalid_auth"}"#).expect("valid event");
        assert_eq!(event, Event::InvalidAuth);

        let event: Event =
            serde_json::from_str(r#"{"type":"other","kind":"reaction_added","payload":{"name":"+1"}}"#)
                .expect("valid event");
        match event {
            Event::Other { kind, payload } => {
                assert_eq!(kind, "reaction_added");
                assert_eq!(payload["name"], "+1");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_kept_as_other() {
        let value = serde_json::json!({"type": "reaction_added", "reaction": "+1"});
        let event = Event::from_json(value.clone()).expect("unknown type decodes");
        assert_eq!(
            event,
            Event::Other {
                kind: "reaction_added".into(),
                payload: value,
            }
        );
    }

    #[test]
    fn known_type_still_has_to_be_well_formed() {
        assert!(Event::from_json(serde_json::json!({"type": "message", "text": "hi"})).is_err());
        assert!(Event::from_json(serde_json::json!({"text": "no type"})).is_err());
        assert_eq!(
            Event::from_json(serde_json::json!({"type": "connected"})).expect("connected"),
            Event::Connected
        );
    }

    #[test]
    fn decode_error_event() {
        let event: Event =
            serde_json::from_str(r#"{"type":"error","description":"socket reset"}"#).expect("valid event");
        assert_eq!(
            event,
            Event::Error {
                description: "socket reset".into()
            }
        );
    }
}
