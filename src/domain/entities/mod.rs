//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod rule;
pub mod conversation;
pub mod timer;
pub mod task;
pub mod session;
pub mod live;

pub use user::{User, AuthStatus};
pub use message::{Message, MessageType, Content};
pub use command::{Command, CommandRegistry};
pub use rule::Rule;
pub use conversation::{Conversation, ConversationEntry, Role};
pub use timer::{CountdownTimer, TimerPhase, TickOutcome, TimerControls, format_clock};
pub use task::{Task, TaskStatus, Priority};
pub use session::{StudySession, format_elapsed};
pub use live::ServerEvent;
