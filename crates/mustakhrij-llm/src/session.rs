//! Conversation context owned by the caller
//!
//! Session state is an explicit object passed into each pipeline run, not
//! ambient globals. Starting over replaces the context wholesale.

use serde::Deserialize;
use serde::Serialize;

use crate::Message;

/// The running history of one conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSession {
    system: Option<String>,
    history: Vec<Message>,
}

impl ChatSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a fixed system instruction
    pub fn with_system(prompt: impl Into<String>) -> Self {
        Self {
            system: Some(prompt.into()),
            history: Vec::new(),
        }
    }

    /// Append a user turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(Message::user(content));
    }

    /// Append an assistant turn
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(Message::assistant(content));
    }

    /// Drop the most recent turn. Used to roll a failed request back out
    /// of the context so the user can retry.
    pub fn pop(&mut self) -> Option<Message> {
        self.history.pop()
    }

    /// The full message list to send: system instruction first, then the
    /// history in order
    pub fn messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        if let Some(system) = &self.system {
            messages.push(Message::system(system.clone()));
        }
        messages.extend(self.history.iter().cloned());
        messages
    }

    /// Number of turns in the history
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Start a new conversation: the history is replaced, the system
    /// instruction survives
    pub fn reset(&mut self) {
        *self = Self {
            system: self.system.take(),
            history: Vec::new(),
        };
    }
}
