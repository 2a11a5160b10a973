//! Console adapter - the terminal surface of the assistant

use async_trait::async_trait;
use std::io::{BufRead, BufReader, Read, Write};
use tokio::sync::mpsc;
use crate::domain::traits::{Bot, BotInfo, Notifier};
use crate::application::errors::AppError;

/// Writes assistant replies to stdout
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: name.into(),
            },
        }
    }

    pub fn prompt(&self) {
        print!("> ");
        let _ = std::io::stdout().flush();
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new("naira")
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), AppError> {
        tracing::info!("Starting console session");
        println!("{} is ready. Type /help for commands.", self.info.name);
        Ok(())
    }

    async fn send_message(&self, text: &str) -> Result<(), AppError> {
        let mut out = std::io::stdout().lock();
        for line in text.lines() {
            writeln!(out, "[{}] {}", self.info.name, line)?;
        }
        out.flush()?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Line reader over stdin
///
/// Lines are read on a plain OS thread and forwarded over a channel. A
/// blocked read never holds up runtime shutdown; the thread is detached and
/// ends with the process.
pub struct ConsoleInput {
    lines: mpsc::UnboundedReceiver<String>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self::from_reader(std::io::stdin())
    }

    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let spawned = std::thread::Builder::new()
            .name("naira-input".to_string())
            .spawn(move || {
                for line in BufReader::new(reader).lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::error!("Failed to read input: {}", e);
                            break;
                        }
                    }
                }
            });
        if let Err(e) = spawned {
            tracing::error!("Failed to start input reader: {}", e);
        }
        Self { lines: rx }
    }

    /// Next line, or `None` at end of input. Cancel safe.
    pub async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints notifications inline with the transcript
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, body: &str) {
        println!("[NOTICE] {}: {}", title, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    /// Reader whose `read` blocks until the paired sender is dropped
    struct Held(std_mpsc::Receiver<()>);

    impl Read for Held {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[test]
    fn test_bot_info_uses_configured_name() {
        let info = ConsoleAdapter::new("tutor").bot_info();
        assert_eq!(info.id, "console");
        assert_eq!(info.name, "tutor");
    }

    #[tokio::test]
    async fn test_reads_lines_then_eof() {
        let mut input = ConsoleInput::from_reader(Cursor::new("hi\n/timer start\n"));
        assert_eq!(input.next_line().await.as_deref(), Some("hi"));
        assert_eq!(input.next_line().await.as_deref(), Some("/timer start"));
        assert_eq!(input.next_line().await, None);
    }

    #[test]
    fn test_runtime_shuts_down_while_input_is_blocked() {
        let (hold, held) = std_mpsc::channel();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let waited = rt.block_on(async move {
            let mut input = ConsoleInput::from_reader(Held(held));
            tokio::time::timeout(Duration::from_millis(50), input.next_line()).await
        });
        assert!(waited.is_err());

        let (done_tx, done_rx) = std_mpsc::channel();
        std::thread::spawn(move || {
            drop(rt);
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(2)).is_ok());
        drop(hold);
    }
}
