//! Application services - Business logic orchestration

pub mod command_service;
pub mod responder;
pub mod chat_service;
pub mod timer_service;
pub mod session_service;
pub mod task_board;
pub mod password;

pub use command_service::CommandService;
pub use responder::{ResponseMatcher, DEFAULT_RULES, FALLBACK_REPLY};
pub use chat_service::ChatSession;
pub use timer_service::{StudyTimer, TickEvent, TickHandle};
pub use session_service::SessionTracker;
pub use task_board::TaskBoard;
pub use password::{check_password_strength, PasswordStrength};
