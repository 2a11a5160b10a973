use async_trait::async_trait;
use crate::application::errors::ApiError;
use crate::domain::entities::{AuthStatus, StudySession, Task, TaskStatus};

/// StudyApi trait - the Naira server's REST surface
#[async_trait]
pub trait StudyApi: Send + Sync {
    /// `GET /auth/check`
    async fn check_auth(&self) -> Result<AuthStatus, ApiError>;

    /// `GET /api/tasks`
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// `PUT /api/tasks/{id}` with `{"status": ...}`
    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<Task, ApiError>;

    /// `DELETE /api/tasks/{id}`
    async fn delete_task(&self, task_id: i64) -> Result<(), ApiError>;

    /// `GET /api/study-sessions`
    async fn list_study_sessions(&self) -> Result<Vec<StudySession>, ApiError>;

    /// `POST /api/study-sessions` with `{"subject": ...}`
    async fn start_study_session(&self, subject: &str) -> Result<StudySession, ApiError>;

    /// `POST /api/study-sessions/{id}/end`
    async fn end_study_session(&self, session_id: i64) -> Result<StudySession, ApiError>;
}
