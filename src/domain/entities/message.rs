/// Type of console input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Text,
    Command,
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Text => "text",
            MessageType::Command => "command",
        }
    }
}

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
    Empty,
}

impl Content {
    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }
}

/// A single line of user input, parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub content: Content,
    pub message_type: MessageType,
}

impl Message {
    pub fn new(content: Content) -> Self {
        let message_type = if content.is_command() {
            MessageType::Command
        } else {
            MessageType::Text
        };
        Self {
            content,
            message_type,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Content::Text(text.into()))
    }

    pub fn from_command(name: impl Into<String>, args: Vec<String>) -> Self {
        Self::new(Content::Command { name: name.into(), args })
    }
}
