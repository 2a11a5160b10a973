//! naira - a terminal study assistant
//!
//! Rule-based chat, a countdown study timer, and a client for the Naira
//! server's task and study-session API.

pub mod domain;
pub mod application;
pub mod infrastructure;
