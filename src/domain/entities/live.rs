use serde::{Deserialize, Serialize};

/// Push events sent by the server over the live-update socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    TaskUpdate {
        task_id: i64,
        completed: bool,
    },
    NewMessage {
        content: String,
        #[serde(default)]
        sender: Option<String>,
    },
    Notification {
        title: String,
        message: String,
    },
}

impl ServerEvent {
    pub const KINDS: [&'static str; 3] = ["task_update", "new_message", "notification"];
}
