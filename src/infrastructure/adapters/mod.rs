//! Adapters - platform integrations

pub mod console;

pub use console::{ConsoleAdapter, ConsoleInput, ConsoleNotifier};
