use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A server-tracked study interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    #[serde(default)]
    pub subject: Option<String>,
    pub start_time: NaiveDateTime,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    /// Whole minutes, filled in by the server once the session ends
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StudySession {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("(no subject)")
    }

    /// Seconds between `start_time` and `now`, never negative
    pub fn elapsed_secs(&self, now: NaiveDateTime) -> i64 {
        (now - self.start_time).num_seconds().max(0)
    }
}

/// `HH:MM:SS`, each zero-padded
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
