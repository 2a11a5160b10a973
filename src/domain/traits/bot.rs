use async_trait::async_trait;
use crate::application::errors::AppError;

/// Bot trait - abstraction for the surface the assistant talks through
#[async_trait]
pub trait Bot: Send + Sync {
    /// Prepare the surface before the first message
    async fn start(&self) -> Result<(), AppError>;

    /// Deliver a reply to the user
    async fn send_message(&self, text: &str) -> Result<(), AppError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}
