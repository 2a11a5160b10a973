//! Message parser - Parses raw console lines into structured messages

use crate::domain::entities::{Message, Content};

/// Parses incoming lines into structured Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Parse a line. Surrounding whitespace is trimmed; a blank line is `Content::Empty`.
    pub fn parse(&self, text: impl Into<String>) -> Message {
        let text = text.into();
        let text = text.trim();

        if text.is_empty() {
            return Message::new(Content::Empty);
        }

        // Check if it's a command
        if self.is_command(text) {
            return self.parse_command(text);
        }

        // Regular chat text
        Message::from_text(text)
    }

    fn is_command(&self, text: &str) -> bool {
        text.starts_with('/')
            || (!self.command_prefix.is_empty() && text.starts_with(&self.command_prefix))
    }

    /// Parse a command message
    fn parse_command(&self, text: &str) -> Message {
        // Remove the command prefix (either / or custom prefix)
        let cmd_text = if text.starts_with('/') {
            text.trim_start_matches('/')
        } else {
            text.trim_start_matches(self.command_prefix.as_str())
        };

        // Split command and arguments
        let mut parts = cmd_text.split_whitespace();
        let name = parts.next().unwrap_or("").to_lowercase();
        let args = parts.map(|s| s.to_string()).collect();

        Message::from_command(name, args)
    }
}
