//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;
use crate::application::services::{ResponseMatcher, DEFAULT_RULES, FALLBACK_REPLY};
use crate::domain::entities::timer::DEFAULT_DURATION_SECS;

/// Assistant configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub chat: ChatConfig,
    pub timer: TimerConfig,
    pub server: ServerConfig,
    pub realtime: RealtimeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

/// Chat rules. `rules` replaces the built-in table when present.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ChatConfig {
    pub fallback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleConfig>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleConfig {
    pub pattern: String,
    pub reply: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TimerConfig {
    pub duration_secs: u32,
    pub tick_millis: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RealtimeConfig {
    pub enabled: bool,
    pub path: String,
    pub initial_backoff_secs: u64,
    pub max_backoff_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "naira".to_string(),
            prefix: "/".to_string(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            fallback: FALLBACK_REPLY.to_string(),
            rules: None,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            tick_millis: 1000,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
            token: None,
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "/ws".to_string(),
            initial_backoff_secs: 5,
            max_backoff_secs: 60,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment variables win over file values
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("NAIRA_SERVER_URL") {
            self.server.base_url = url;
        }

        if let Ok(token) = std::env::var("NAIRA_TOKEN") {
            self.server.token = Some(token);
        }

        if let Ok(prefix) = std::env::var("NAIRA_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(secs) = std::env::var("NAIRA_TIMER_SECS") {
            match secs.parse() {
                Ok(secs) => self.timer.duration_secs = secs,
                Err(_) => tracing::warn!("Ignoring NAIRA_TIMER_SECS={}: not a number", secs),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.duration_secs == 0 {
            return Err(ConfigError::InvalidValue("timer.duration-secs must be greater than 0".to_string()));
        }
        if self.timer.tick_millis == 0 {
            return Err(ConfigError::InvalidValue("timer.tick-millis must be greater than 0".to_string()));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("server.request-timeout-secs must be greater than 0".to_string()));
        }
        if self.server.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("server.base-url".to_string()));
        }
        if self.realtime.initial_backoff_secs == 0 || self.realtime.max_backoff_secs < self.realtime.initial_backoff_secs {
            return Err(ConfigError::InvalidValue(
                "realtime backoff must satisfy 0 < initial-backoff-secs <= max-backoff-secs".to_string(),
            ));
        }
        Ok(())
    }

    /// Compile the chat rule table, configured or built-in
    pub fn matcher(&self) -> Result<ResponseMatcher, ConfigError> {
        let result = match &self.chat.rules {
            Some(rules) => {
                let pairs: Vec<(&str, &str)> = rules
                    .iter()
                    .map(|r| (r.pattern.as_str(), r.reply.as_str()))
                    .collect();
                ResponseMatcher::from_pairs(&pairs, self.chat.fallback.clone())
            }
            None => ResponseMatcher::from_pairs(DEFAULT_RULES, self.chat.fallback.clone()),
        };
        result.map_err(|e| ConfigError::InvalidValue(format!("chat rule pattern: {}", e)))
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.timer.tick_millis)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bot.prefix, "/");
        assert_eq!(config.timer.duration_secs, 1500);
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
        assert_eq!(config.matcher().unwrap().rules().len(), 4);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("timer:\n  duration-secs: 300\n").unwrap();
        assert_eq!(config.timer.duration_secs, 300);
        assert_eq!(config.timer.tick_millis, 1000);
        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let yaml = r#"
chat:
  fallback: "Hmm?"
  rules:
    - pattern: "\\bexam\\b"
      reply: "Good luck!"
"#;
        let matcher = Config::from_yaml(yaml).unwrap().matcher().unwrap();
        assert_eq!(matcher.respond("Exam tomorrow"), "Good luck!");
        assert_eq!(matcher.respond("hello"), "Hmm?");
    }

    #[test]
    fn test_invalid_rule_pattern() {
        let yaml = "chat:\n  rules:\n    - pattern: \"(oops\"\n      reply: x\n";
        let err = Config::from_yaml(yaml).unwrap().matcher().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = Config::from_yaml("timer:\n  duration-secs: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let err = Config::from_yaml("server:\n  request-timeout-secs: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_yaml_roundtrip_of_default() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("duration-secs: 1500"));
        assert!(Config::from_yaml(&yaml).is_ok());
    }
}
