//! Conversation transcript entries.

use chrono::{DateTime, Local};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One line of the transcript. Immutable once created.
#[derive(Clone, Debug)]
pub struct ConversationEntry {
    role: Role,
    content: String,
    timestamp: DateTime<Local>,
}

impl ConversationEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Short clock label shown under a message bubble
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_role() {
        let u = ConversationEntry::user("hi");
        let a = ConversationEntry::assistant("hello");
        assert!(u.is_user());
        assert_eq!(a.role(), Role::Assistant);
        assert_eq!(a.content(), "hello");
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn test_time_label_format() {
        let e = ConversationEntry::user("x");
        let label = e.time_label();
        assert_eq!(label.len(), 5);
        assert_eq!(&label[2..3], ":");
    }
}
