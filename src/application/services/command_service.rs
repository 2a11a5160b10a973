use crate::domain::entities::{Command, CommandRegistry};
use crate::application::errors::CommandError;

/// Service for looking up console commands and rendering help
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        self.register(Command::new("help")
            .with_description("Show help message")
            .with_aliases(&["h"])
            .with_usage("help [command]"));

        self.register(Command::new("version")
            .with_description("Show version"));

        self.register(Command::new("timer")
            .with_description("Control the study timer")
            .with_aliases(&["t"])
            .with_usage("timer start|pause|reset|status"));

        self.register(Command::new("tasks")
            .with_description("List your tasks")
            .with_aliases(&["ls"])
            .online());

        self.register(Command::new("done")
            .with_description("Mark a task completed")
            .with_usage("done <task-id>")
            .online());

        self.register(Command::new("undo")
            .with_description("Mark a task pending again")
            .with_usage("undo <task-id>")
            .online());

        self.register(Command::new("delete")
            .with_description("Delete a task")
            .with_aliases(&["rm"])
            .with_usage("delete <task-id>")
            .online());

        self.register(Command::new("session")
            .with_description("Track a study session")
            .with_aliases(&["s"])
            .with_usage("session start <subject>|end|status")
            .online());

        self.register(Command::new("history")
            .with_description("Show the conversation so far"));

        self.register(Command::new("strength")
            .with_description("Rate a password")
            .with_usage("strength <password>"));

        self.register(Command::new("quit")
            .with_description("Leave Naira")
            .with_aliases(&["exit", "q"]));
    }

    /// Find a command by name or alias
    pub fn resolve(&self, name: &str) -> Result<&Command, CommandError> {
        self.registry
            .find(name)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            if let Some(cmd) = self.registry.find(name) {
                let mut help = format!("{}{} - {}", self.prefix, cmd.name, cmd.description.as_deref().unwrap_or("No description"));
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}{}", self.prefix, usage));
                }
                if !cmd.aliases.is_empty() {
                    help.push_str(&format!("\nAliases: {}", cmd.aliases.join(", ")));
                }
                return help;
            }
            return format!("Command {}{} not found", self.prefix, name);
        }

        // List all commands
        let mut help = "Available commands:\n".to_string();
        for cmd in self.registry.all() {
            help.push_str(&format!("  {}{} - {}\n", self.prefix, cmd.name, cmd.description.as_deref().unwrap_or("")));
        }
        help.push_str("Anything else is sent to the chat assistant.");
        help
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CommandService {
        let mut commands = CommandService::new("/");
        commands.register_defaults();
        commands
    }

    #[test]
    fn test_resolve_alias() {
        let commands = service();
        assert_eq!(commands.resolve("t").unwrap().name, "timer");
        assert!(commands.resolve("rm").unwrap().needs_server);
        assert!(matches!(commands.resolve("dance"), Err(CommandError::NotFound(n)) if n == "dance"));
    }

    #[test]
    fn test_help_for_one_command() {
        let commands = service();
        assert_eq!(
            commands.get_help(Some("timer")),
            "/timer - Control the study timer\nUsage: /timer start|pause|reset|status\nAliases: t"
        );
        assert_eq!(commands.get_help(Some("nope")), "Command /nope not found");
    }

    #[test]
    fn test_help_lists_in_registration_order() {
        let help = service().get_help(None);
        let help_pos = help.find("/help").unwrap();
        let quit_pos = help.find("/quit").unwrap();
        assert!(help_pos < quit_pos);
    }
}
