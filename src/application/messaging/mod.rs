//! Message handling - Turning raw console lines into structured messages

pub mod parser;

pub use parser::MessageParser;
