//! The chat transcript and its canned bot behavior.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Delay before the simulated bot reply lands in the transcript.
pub const REPLY_DELAY: Duration = Duration::from_millis(500);

/// Prompt chips rendered under the message list.
pub const SUGGESTED_PROMPTS: &[&str] = &[
    "Is it safe at night?",
    "Show me recent incidents",
    "What's the crime trend?",
];

/// The scripted exchange every transcript opens with.
const OPENING_QUESTION: &str = "Is it safe here?";
const OPENING_ANSWER: &str = "Area labeled Caution - 3 incidents reported in the last 7 days \
     within 0.5 miles. View details on map.";

/// The fixed reply the bot sends for any user message.
const HOLDING_REPLY: &str = "I'm analyzing the safety data for this location. Please wait...";

/// Who sent a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum Role {
    User,
    Bot,
}

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent it.
    pub role: Role,
    /// The message text.
    pub text: String,
}

/// An ordered, append-only chat transcript.
///
/// Shared behind `Arc<Mutex<..>>` so the delayed bot reply can land after
/// the sender has moved on. The reply task is deliberately not cancelled
/// when the transcript handle is dropped; it keeps the shared message
/// list alive and appends to it regardless of whether anything is still
/// rendering it.
#[derive(Clone)]
pub struct Transcript {
    messages: Arc<Mutex<Vec<ChatMessage>>>,
}

impl Transcript {
    /// Creates a transcript holding the opening scripted exchange.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(vec![
                ChatMessage {
                    role: Role::User,
                    text: OPENING_QUESTION.to_string(),
                },
                ChatMessage {
                    role: Role::Bot,
                    text: OPENING_ANSWER.to_string(),
                },
            ])),
        }
    }

    /// A snapshot of the messages in order.
    ///
    /// # Panics
    ///
    /// Panics if the transcript lock is poisoned.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .expect("transcript lock poisoned")
            .clone()
    }

    /// Appends a user message and schedules the delayed bot reply.
    ///
    /// Blank input (empty or whitespace-only) is ignored and returns
    /// `None`. Otherwise the returned handle resolves once the reply has
    /// been appended; callers may await it, but nothing requires them to.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if the transcript lock is poisoned.
    pub fn send(&self, text: &str) -> Option<tokio::task::JoinHandle<()>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.messages
            .lock()
            .expect("transcript lock poisoned")
            .push(ChatMessage {
                role: Role::User,
                text: text.to_string(),
            });

        let messages = Arc::clone(&self.messages);
        Some(tokio::spawn(async move {
            tokio::time::sleep(REPLY_DELAY).await;
            messages
                .lock()
                .expect("transcript lock poisoned")
                .push(ChatMessage {
                    role: Role::Bot,
                    text: HOLDING_REPLY.to_string(),
                });
        }))
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_with_the_scripted_exchange() {
        let transcript = Transcript::new();
        let messages = transcript.messages();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Bot);
        assert!(messages[1].text.contains("Caution"));
    }

    #[tokio::test]
    async fn send_appends_user_message_then_delayed_reply() {
        let transcript = Transcript::new();
        let handle = transcript.send("Is it safe at night?").unwrap();

        // The user message is visible immediately, the reply is not.
        assert_eq!(transcript.messages().len(), 3);

        handle.await.unwrap();
        let messages = transcript.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[3].role, Role::Bot);
        assert_eq!(messages[3].text, HOLDING_REPLY);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let transcript = Transcript::new();
        assert!(transcript.send("").is_none());
        assert!(transcript.send("   ").is_none());
        assert_eq!(transcript.messages().len(), 2);
    }

    #[tokio::test]
    async fn reply_lands_even_after_sender_handle_is_dropped() {
        let transcript = Transcript::new();
        let watcher = transcript.clone();
        let handle = transcript.send("hello").unwrap();
        drop(transcript);

        handle.await.unwrap();
        assert_eq!(watcher.messages().len(), 4);
    }
}
