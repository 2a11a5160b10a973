//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Responder, chat session, timer driver, task board, session tracker
//! - App: The event-driven owner of all per-user state
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing

pub mod app;
pub mod errors;
pub mod services;
pub mod messaging;

pub use app::{App, AppChannels, AppEvent, Response};
