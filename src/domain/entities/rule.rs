use regex_lite::{Regex, RegexBuilder};

/// A canned reply triggered by a case-insensitive pattern
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    reply: String,
}

impl Rule {
    /// Compile `pattern` case-insensitively
    pub fn new(pattern: &str, reply: impl Into<String>) -> Result<Self, regex_lite::Error> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            pattern,
            reply: reply.into(),
        })
    }

    /// True when the pattern matches anywhere in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}
