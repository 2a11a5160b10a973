//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Api: HTTP client for the Naira server
//! - Realtime: WebSocket live updates
//! - Adapters: Terminal surface

pub mod config;
pub mod api;
pub mod realtime;
pub mod adapters;
