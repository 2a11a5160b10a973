use crate::domain::entities::{Conversation, Role};
use super::responder::ResponseMatcher;

/// Chat session: the rule matcher plus the conversation it has produced
pub struct ChatSession {
    matcher: ResponseMatcher,
    log: Conversation,
}

impl ChatSession {
    pub fn new(matcher: ResponseMatcher) -> Self {
        Self {
            matcher,
            log: Conversation::new(),
        }
    }

    /// Record the user's text and the matcher's answer. Blank input is ignored.
    pub fn send(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.log.push(Role::User, text);
        let reply = self.matcher.respond(text).to_string();
        self.log.push(Role::Bot, reply.clone());
        tracing::debug!(entries = self.log.len(), "chat reply recorded");
        Some(reply)
    }

    /// Record a bot message that arrived from elsewhere (server push)
    pub fn receive(&mut self, content: impl Into<String>) {
        self.log.push(Role::Bot, content);
    }

    pub fn conversation(&self) -> &Conversation {
        &self.log
    }

    pub fn transcript(&self) -> String {
        self.log.render()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(ResponseMatcher::default())
    }
}
