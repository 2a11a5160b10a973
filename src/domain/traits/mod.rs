//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod study_api;
pub mod notifier;

pub use bot::{Bot, BotInfo};
pub use study_api::StudyApi;
pub use notifier::Notifier;
