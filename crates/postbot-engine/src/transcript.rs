//! The visible chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single transcript entry. Never changed after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, append-only list of messages.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Messages from the bot, oldest first.
    pub fn bot_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.sender == Sender::Bot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let user = Message::user("Track my parcel");
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text, "Track my parcel");

        let bot = Message::bot("Sure!");
        assert_eq!(bot.sender, Sender::Bot);
    }

    #[test]
    fn test_transcript_appends_in_order_and_clears() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("one"));
        transcript.push(Message::bot("two"));
        transcript.push(Message::user("three"));

        let texts: Vec<&str> = transcript.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(transcript.bot_messages().count(), 1);
        assert_eq!(transcript.last().map(|m| m.text.as_str()), Some("three"));

        transcript.clear();
        assert!(transcript.is_empty());
    }
}
