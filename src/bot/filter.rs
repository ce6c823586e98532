//! Self-origin and addressing filters.
//!
//! A message reaches matching only when it was not sent by the bot itself
//! and it either mentions the bot or arrives on a direct channel.

use crate::event::MessageEvent;
use crate::transport::Identity;
use std::borrow::Cow;

/// Reserved platform user that posts system messages.
pub const SYSTEM_BOT_USER: &str = "USLACKBOT";

/// Why a message was dropped before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Posted by the bot itself.
    SelfOrigin,
    /// Posted by another bot or the system user.
    Bot,
    /// Neither mentions the bot nor arrived on a direct channel.
    Unaddressed,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfOrigin => "self",
            Self::Bot => "bot",
            Self::Unaddressed => "unaddressed",
        }
    }
}

/// Decides whether a message is addressed to the bot.
#[derive(Debug, Clone)]
pub struct Addressing {
    direct_channel_prefix: String,
    ignore_bot_messages: bool,
}

impl Default for Addressing {
    fn default() -> Self {
        Self::new("D", false)
    }
}

impl Addressing {
    pub fn new(direct_channel_prefix: impl Into<String>, ignore_bot_messages: bool) -> Self {
        Self {
            direct_channel_prefix: direct_channel_prefix.into(),
            ignore_bot_messages,
        }
    }

    /// Admit or drop `msg`.
    pub fn check(&self, msg: &MessageEvent, identity: &Identity) -> Result<(), DropReason> {
        if is_from_self(msg, identity) {
            return Err(DropReason::SelfOrigin);
        }
        if self.ignore_bot_messages && is_from_bot(msg) {
            return Err(DropReason::Bot);
        }
        if !is_mentioned(msg, identity) && !self.is_direct(msg) {
            return Err(DropReason::Unaddressed);
        }
        Ok(())
    }

    /// Whether `msg` arrived on a one-to-one channel.
    pub fn is_direct(&self, msg: &MessageEvent) -> bool {
        msg.channel.starts_with(&self.direct_channel_prefix)
    }
}

fn is_from_self(msg: &MessageEvent, identity: &Identity) -> bool {
    !identity.user_id.is_empty() && msg.user == identity.user_id
}

fn is_from_bot(msg: &MessageEvent) -> bool {
    msg.user.is_empty() || msg.user == SYSTEM_BOT_USER || msg.bot_id.is_some()
}

/// Whether the text or the first attachment's pretext mentions the bot.
pub fn is_mentioned(msg: &MessageEvent, identity: &Identity) -> bool {
    if identity.user_id.is_empty() {
        return false;
    }
    let mention = identity.mention();
    msg.text.contains(&mention)
        || msg
            .attachment_pretext()
            .is_some_and(|p| p.contains(&mention))
}

/// Blank out every mention of the bot so matching sees only the command.
pub fn strip_mention<'a>(text: &'a str, identity: &Identity) -> Cow<'a, str> {
    let mention = identity.mention();
    if identity.user_id.is_empty() || !text.contains(&mention) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.replace(&mention, " "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Attachment;

    fn bot() -> Identity {
        Identity::new("UBOT")
    }

    #[test]
    fn direct_message_is_admitted() {
        let msg = MessageEvent::new("D123", "U1", "ping");
        assert_eq!(Addressing::default().check(&msg, &bot()), Ok(()));
    }

    #[test]
    fn mention_in_channel_is_admitted() {
        let msg = MessageEvent::new("C123", "U1", "<@UBOT> ping");
        assert_eq!(Addressing::default().check(&msg, &bot()), Ok(()));
    }

    #[test]
    fn mention_in_attachment_pretext_is_admitted() {
        let msg = MessageEvent::new("C123", "U1", "")
            .with_attachment(Attachment::pretext("<@UBOT> deploy"));
        assert_eq!(Addressing::default().check(&msg, &bot()), Ok(()));
    }

    #[test]
    fn unaddressed_channel_message_is_dropped() {
        let msg = MessageEvent::new("C123", "U1", "ping");
        assert_eq!(
            Addressing::default().check(&msg, &bot()),
            Err(DropReason::Unaddressed)
        );
    }

    #[test]
    fn mention_of_someone_else_is_dropped() {
        let msg = MessageEvent::new("C123", "U1", "<@UOTHER> ping");
        assert_eq!(
            Addressing::default().check(&msg, &bot()),
            Err(DropReason::Unaddressed)
        );
    }

    #[test]
    fn own_messages_are_dropped() {
        let msg = MessageEvent::new("D123", "UBOT", "pong");
        assert_eq!(
            Addressing::default().check(&msg, &bot()),
            Err(DropReason::SelfOrigin)
        );
    }

    #[test]
    fn other_bots_dropped_only_when_configured() {
        let msg = MessageEvent::new("D123", "U9", "ping").with_bot_id("B1");
        assert_eq!(Addressing::default().check(&msg, &bot()), Ok(()));
        assert_eq!(
            Addressing::new("D", true).check(&msg, &bot()),
            Err(DropReason::Bot)
        );
        let system = MessageEvent::new("D123", SYSTEM_BOT_USER, "reminder");
        assert_eq!(
            Addressing::new("D", true).check(&system, &bot()),
            Err(DropReason::Bot)
        );
    }

    #[test]
    fn custom_direct_prefix() {
        let addressing = Addressing::new("DM-", false);
        assert!(addressing.is_direct(&MessageEvent::new("DM-42", "U1", "x")));
        assert!(!addressing.is_direct(&MessageEvent::new("D42", "U1", "x")));
    }

    #[test]
    fn strip_mention_blanks_token() {
        assert_eq!(strip_mention("<@UBOT> deploy prod", &bot()), "  deploy prod");
        assert!(matches!(strip_mention("deploy prod", &bot()), Cow::Borrowed(_)));
    }

    #[test]
    fn reason_labels() {
        assert_eq!(DropReason::SelfOrigin.as_str(), "self");
        assert_eq!(DropReason::Bot.as_str(), "bot");
        assert_eq!(DropReason::Unaddressed.as_str(), "unaddressed");
    }
}
