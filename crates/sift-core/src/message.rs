//! Conversation entries.
//!
//! A conversation is an ordered slice of `Message`s owned by the caller.
//! Position in the slice is the message index; it doubles as identity unless
//! the caller supplies a durable `key`.

use serde::{Deserialize, Serialize};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Returns true for user-authored messages (the only editable role).
    pub fn is_user(self) -> bool {
        matches!(self, Role::User)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single conversation entry.
///
/// Serialized with the field names used by transcript files:
/// `{"message": "...", "role": "user", "disableAnimation": true, "key": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Durable identity supplied by the producer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub role: Role,
    /// Message body. May contain inline markup.
    #[serde(rename = "message")]
    pub text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable_animation: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            key: None,
            role: Role::User,
            text: text.into(),
            disable_animation: false,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            key: None,
            role: Role::Assistant,
            text: text.into(),
            disable_animation: false,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn without_animation(mut self) -> Self {
        self.disable_animation = true;
        self
    }

    /// Identity of this message when it sits at `index` in a conversation.
    pub fn identity(&self, index: usize) -> Identity {
        match &self.key {
            Some(key) => Identity::Key(key.clone()),
            None => Identity::Position(index),
        }
    }
}

/// Identity used to match message instances across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Caller-supplied durable key.
    Key(String),
    /// Positional fallback (0-based index).
    Position(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_transcript_field_names() {
        let json = r#"[
            {"message": "Hi", "role": "user"},
            {"message": "<b>Hello</b>", "role": "assistant", "disableAnimation": true, "key": "a1"}
        ]"#;
        let messages: Vec<Message> = serde_json::from_str(json).unwrap();

        assert_eq!(messages[0], Message::user("Hi"));
        assert_eq!(messages[1].role, Role::Assistant);
        assert!(messages[1].disable_animation);
        assert_eq!(messages[1].key.as_deref(), Some("a1"));
    }

    #[test]
    fn test_serialization_omits_defaults() {
        let json = serde_json::to_string(&Message::user("Hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","message":"Hi"}"#);
    }

    #[test]
    fn test_identity_prefers_key_over_position() {
        assert_eq!(Message::user("a").identity(3), Identity::Position(3));
        assert_eq!(
            Message::user("a").with_key("k").identity(3),
            Identity::Key("k".to_string())
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"message": "x", "role": "system"}"#;
        assert!(serde_json::from_str::<Message>(json).is_err());
    }
}
