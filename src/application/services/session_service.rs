use chrono::NaiveDateTime;

use crate::application::errors::SessionError;
use crate::domain::entities::{format_elapsed, StudySession};

/// Holds the one study session the user currently has open, if any
#[derive(Debug, Default)]
pub struct SessionTracker {
    active: Option<StudySession>,
    starting: bool,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&StudySession> {
        self.active.as_ref()
    }

    /// Reserve the slot before a start request goes out, so a second
    /// `session start` cannot race the first one.
    pub fn reserve(&mut self) -> Result<(), SessionError> {
        if let Some(session) = &self.active {
            return Err(SessionError::AlreadyActive(session.subject().to_string()));
        }
        if self.starting {
            return Err(SessionError::AlreadyActive("(starting)".to_string()));
        }
        self.starting = true;
        Ok(())
    }

    /// Release a reservation whose start request failed
    pub fn release(&mut self) {
        self.starting = false;
    }

    pub fn begin(&mut self, session: StudySession) -> Result<&StudySession, SessionError> {
        if let Some(current) = &self.active {
            return Err(SessionError::AlreadyActive(current.subject().to_string()));
        }
        self.starting = false;
        Ok(&*self.active.insert(session))
    }

    pub fn finish(&mut self) -> Result<StudySession, SessionError> {
        self.active.take().ok_or(SessionError::NotActive)
    }

    pub fn elapsed_display(&self, now: NaiveDateTime) -> Option<String> {
        self.active
            .as_ref()
            .map(|session| format_elapsed(session.elapsed_secs(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn session(id: i64, subject: &str) -> StudySession {
        StudySession {
            id,
            subject: Some(subject.to_string()),
            start_time: NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|d| d.and_hms_opt(9, 0, 0))
                .unwrap(),
            end_time: None,
            duration: None,
            notes: None,
        }
    }

    #[test]
    fn test_begin_and_finish() {
        let mut tracker = SessionTracker::new();
        tracker.reserve().unwrap();
        tracker.begin(session(1, "Physics")).unwrap();

        assert_eq!(
            tracker.reserve(),
            Err(SessionError::AlreadyActive("Physics".to_string()))
        );
        assert_eq!(tracker.finish().map(|s| s.id), Ok(1));
        assert_eq!(tracker.finish(), Err(SessionError::NotActive));
    }

    #[test]
    fn test_reservation_blocks_second_start() {
        let mut tracker = SessionTracker::new();
        tracker.reserve().unwrap();
        assert!(tracker.reserve().is_err());
        tracker.release();
        assert!(tracker.reserve().is_ok());
    }

    #[test]
    fn test_elapsed_display() {
        let mut tracker = SessionTracker::new();
        let s = session(2, "Art");
        let now = s.start_time + Duration::seconds(3725);
        assert_eq!(tracker.elapsed_display(now), None);

        tracker.begin(s).unwrap();
        assert_eq!(tracker.elapsed_display(now).as_deref(), Some("01:02:05"));
    }
}
