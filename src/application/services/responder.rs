//! Rule-based reply matching

use crate::domain::entities::Rule;

/// Reply used when no rule matches
pub const FALLBACK_REPLY: &str = "I'm sorry, I don't understand. Can you rephrase?";

/// Built-in rules, in match order
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    (r"^(hi|hello|hey)\b", "Hello! I'm Naira, your educational assistant."),
    (r"\b(homework|assignment)\b", "Sure—what subject are you working on?"),
    (r"\b(thanks|thank you)\b", "You're welcome!"),
    (r"\b(bye|goodbye)\b", "Goodbye! If you need more help, just let me know."),
];

/// Ordered rule table; the first matching rule wins
#[derive(Debug, Clone)]
pub struct ResponseMatcher {
    rules: Vec<Rule>,
    fallback: String,
}

impl ResponseMatcher {
    pub fn new(rules: Vec<Rule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Compile `(pattern, reply)` pairs, keeping their order
    pub fn from_pairs<P, R>(pairs: &[(P, R)], fallback: impl Into<String>) -> Result<Self, regex_lite::Error>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let rules = pairs
            .iter()
            .map(|(pattern, reply)| Rule::new(pattern.as_ref(), reply.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules, fallback))
    }

    /// Reply for `text`: the first matching rule's reply, or the fallback
    pub fn respond(&self, text: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map(Rule::reply)
            .unwrap_or(self.fallback.as_str())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for ResponseMatcher {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_RULES, FALLBACK_REPLY).unwrap_or_else(|e| {
            tracing::error!("Built-in chat rules failed to compile: {}", e);
            Self::new(Vec::new(), FALLBACK_REPLY)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: &str = "Hello! I'm Naira, your educational assistant.";

    #[test]
    fn test_greetings_at_start() {
        let matcher = ResponseMatcher::default();
        for input in ["hi", "Hello", "HEY", "hi there", "hey, how are you?", "Hello!!!"] {
            assert_eq!(matcher.respond(input), GREETING, "input: {input}");
        }
    }

    #[test]
    fn test_greeting_must_lead_the_message() {
        let matcher = ResponseMatcher::default();
        assert_eq!(matcher.respond("oh hi"), FALLBACK_REPLY);
        assert_eq!(matcher.respond("highlight this"), FALLBACK_REPLY);
    }

    #[test]
    fn test_canned_replies() {
        let matcher = ResponseMatcher::default();
        assert_eq!(matcher.respond("What's my homework?"), "Sure—what subject are you working on?");
        assert_eq!(matcher.respond("got an ASSIGNMENT due"), "Sure—what subject are you working on?");
        assert_eq!(matcher.respond("thanks so much"), "You're welcome!");
        assert_eq!(matcher.respond("ok thank you"), "You're welcome!");
        assert_eq!(matcher.respond("goodbye friend"), "Goodbye! If you need more help, just let me know.");
    }

    #[test]
    fn test_fallback() {
        let matcher = ResponseMatcher::default();
        assert_eq!(matcher.respond("xyzzy"), FALLBACK_REPLY);
        assert_eq!(matcher.respond(""), FALLBACK_REPLY);
    }

    #[test]
    fn test_first_match_wins() {
        let matcher = ResponseMatcher::default();
        assert_eq!(matcher.respond("hello, I need help with homework"), GREETING);
        assert_eq!(matcher.respond("hi there, I have homework"), GREETING);
        assert_eq!(matcher.respond("thanks for the homework help, bye"), "Sure—what subject are you working on?");
    }

    #[test]
    fn test_default_table_compiles_in_order() {
        let matcher = ResponseMatcher::default();
        let patterns: Vec<&str> = matcher.rules().iter().map(|r| r.pattern()).collect();
        let expected: Vec<&str> = DEFAULT_RULES.iter().map(|(p, _)| *p).collect();
        assert_eq!(patterns, expected);
    }

    #[test]
    fn test_custom_table_keeps_order() {
        let matcher = ResponseMatcher::from_pairs(
            &[("exam", "Good luck!"), ("exam|test", "Study hard!")],
            "?",
        )
        .unwrap();
        assert_eq!(matcher.respond("my EXAM is tomorrow"), "Good luck!");
        assert_eq!(matcher.respond("a test"), "Study hard!");
        assert_eq!(matcher.respond("nothing"), "?");
        assert_eq!(matcher.rules().len(), 2);
    }
}
