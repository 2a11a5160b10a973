//! App - the single owner of chat, timer, task and session state
//!
//! Every event (a line of input, a timer tick, a finished server request, a
//! live push) is handled by `&mut App` one at a time. Server requests are
//! spawned and report back through [`AppEvent`]s, so nothing here ever waits
//! on the network.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::errors::{ApiError, CommandError, SessionError};
use crate::application::messaging::MessageParser;
use crate::application::services::{
    check_password_strength, ChatSession, CommandService, ResponseMatcher, SessionTracker,
    StudyTimer, TaskBoard, TickEvent,
};
use crate::domain::entities::{
    AuthStatus, Content, ServerEvent, StudySession, Task, TaskStatus, TickOutcome, TimerPhase,
};
use crate::domain::traits::{Notifier, StudyApi};

/// Title and body shown when a countdown finishes
pub const COMPLETE_TITLE: &str = "Study Session Complete";
pub const COMPLETE_BODY: &str = "Great job! Take a break.";

/// Results of background work, delivered back to the loop
#[derive(Debug)]
pub enum AppEvent {
    AuthChecked(Result<AuthStatus, ApiError>),
    TasksLoaded(Result<Vec<Task>, ApiError>),
    TaskUpdated(Result<Task, ApiError>),
    TaskDeleted { id: i64, result: Result<(), ApiError> },
    SessionsLoaded(Result<Vec<StudySession>, ApiError>),
    SessionStarted(Result<StudySession, ApiError>),
    SessionEnded(Result<StudySession, ApiError>),
}

/// What the loop should do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Say(String),
    Silent,
    Quit,
}

impl Response {
    fn error(err: impl std::fmt::Display) -> Self {
        Response::Say(format!("Error: {}", err))
    }
}

/// Receivers the event loop polls alongside user input
pub struct AppChannels {
    pub ticks: mpsc::UnboundedReceiver<TickEvent>,
    pub events: mpsc::UnboundedReceiver<AppEvent>,
}

pub struct App {
    parser: MessageParser,
    commands: CommandService,
    chat: ChatSession,
    timer: StudyTimer,
    sessions: SessionTracker,
    board: TaskBoard,
    api: Option<Arc<dyn StudyApi>>,
    notifier: Arc<dyn Notifier>,
    events: mpsc::UnboundedSender<AppEvent>,
    user: Option<String>,
    /// Set once the server says nobody is signed in
    signed_out: bool,
}

/// Inputs for [`App::new`]
pub struct AppSettings {
    pub prefix: String,
    pub matcher: ResponseMatcher,
    pub timer_secs: u32,
    pub tick_period: std::time::Duration,
}

impl App {
    /// `api` is `None` in offline mode; server commands then report an error.
    pub fn new(
        settings: AppSettings,
        api: Option<Arc<dyn StudyApi>>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, AppChannels) {
        let mut commands = CommandService::new(settings.prefix.clone());
        commands.register_defaults();

        let (timer, ticks) = StudyTimer::new(settings.timer_secs, settings.tick_period);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let app = Self {
            parser: MessageParser::new(settings.prefix),
            commands,
            chat: ChatSession::new(settings.matcher),
            timer,
            sessions: SessionTracker::new(),
            board: TaskBoard::new(),
            api,
            notifier,
            events: events_tx,
            user: None,
            signed_out: false,
        };
        (app, AppChannels { ticks, events: events_rx })
    }

    pub fn is_online(&self) -> bool {
        self.api.is_some()
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn timer(&self) -> &StudyTimer {
        &self.timer
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Kick off the startup requests: auth check, task list and any open session
    pub fn bootstrap(&self) -> Result<(), CommandError> {
        self.spawn_api(|api| async move { AppEvent::AuthChecked(api.check_auth().await) })?;
        self.spawn_api(|api| async move { AppEvent::TasksLoaded(api.list_tasks().await) })?;
        self.spawn_api(|api| async move {
            AppEvent::SessionsLoaded(api.list_study_sessions().await)
        })?;
        Ok(())
    }

    /// Handle one line typed by the user
    pub fn handle_input(&mut self, line: &str) -> Response {
        let message = self.parser.parse(line);
        if message.content != Content::Empty {
            tracing::debug!(kind = message.message_type.as_str(), "handling input");
        }
        match message.content {
            Content::Empty => Response::Silent,
            Content::Text(text) => match self.chat.send(&text) {
                Some(reply) => Response::Say(reply),
                None => Response::Silent,
            },
            Content::Command { name, args } => match self.run_command(&name, &args) {
                Ok(response) => response,
                Err(e) => Response::error(e),
            },
        }
    }

    fn run_command(&mut self, name: &str, args: &[String]) -> Result<Response, CommandError> {
        let command = self.commands.resolve(name)?;
        if command.needs_server && self.api.is_none() {
            return Err(CommandError::ExecutionFailed(format!(
                "{} needs the Naira server; start with `naira run`",
                command.name
            )));
        }
        if command.needs_server && self.signed_out {
            return Err(CommandError::ExecutionFailed(format!(
                "{} needs you to sign in to the Naira server first",
                command.name
            )));
        }

        let canonical = command.name.clone();
        tracing::debug!(command = %canonical, ?args, "running command");

        match canonical.as_str() {
            "help" => Ok(Response::Say(self.commands.get_help(args.first().map(String::as_str)))),
            "version" => Ok(Response::Say(format!("naira v{}", env!("CARGO_PKG_VERSION")))),
            "timer" => self.timer_command(args),
            "tasks" => {
                self.spawn_api(|api| async move { AppEvent::TasksLoaded(api.list_tasks().await) })?;
                Ok(Response::Silent)
            }
            "done" => self.set_task_status(args, TaskStatus::Completed),
            "undo" => self.set_task_status(args, TaskStatus::Pending),
            "delete" => {
                let id = parse_task_id(args)?;
                self.spawn_api(move |api| async move {
                    AppEvent::TaskDeleted { id, result: api.delete_task(id).await }
                })?;
                Ok(Response::Silent)
            }
            "session" => self.session_command(args),
            "history" => {
                let transcript = self.chat.transcript();
                if transcript.is_empty() {
                    Ok(Response::Say("No messages yet.".to_string()))
                } else {
                    Ok(Response::Say(transcript))
                }
            }
            "strength" => {
                if args.is_empty() {
                    return Err(CommandError::InvalidArgs("usage: strength <password>".to_string()));
                }
                Ok(Response::Say(check_password_strength(&args.join(" ")).render()))
            }
            "quit" => Ok(Response::Quit),
            other => Err(CommandError::NotFound(other.to_string())),
        }
    }

    fn timer_command(&mut self, args: &[String]) -> Result<Response, CommandError> {
        let action = args.first().map(|a| a.to_lowercase()).unwrap_or_else(|| "status".to_string());
        match action.as_str() {
            "start" => {
                if !self.timer.start() {
                    let reason = if self.timer.phase() == TimerPhase::Completed {
                        "Timer finished. Use timer reset first."
                    } else {
                        "Timer is already running."
                    };
                    return Ok(Response::Say(reason.to_string()));
                }
            }
            "pause" => {
                if !self.timer.pause() {
                    return Ok(Response::Say("Timer is not running.".to_string()));
                }
            }
            "reset" => self.timer.reset(),
            "status" => {}
            other => {
                return Err(CommandError::InvalidArgs(format!(
                    "unknown timer action `{}` (start, pause, reset, status)",
                    other
                )))
            }
        }
        Ok(Response::Say(self.timer.status_line()))
    }

    fn set_task_status(&mut self, args: &[String], status: TaskStatus) -> Result<Response, CommandError> {
        let id = parse_task_id(args)?;
        self.spawn_api(move |api| async move {
            AppEvent::TaskUpdated(api.update_task_status(id, status).await)
        })?;
        Ok(Response::Silent)
    }

    fn session_command(&mut self, args: &[String]) -> Result<Response, CommandError> {
        let action = args.first().map(|a| a.to_lowercase()).unwrap_or_else(|| "status".to_string());
        match action.as_str() {
            "start" => {
                let subject = args[1..].join(" ");
                if subject.is_empty() {
                    return Err(CommandError::InvalidArgs("usage: session start <subject>".to_string()));
                }
                self.sessions.reserve().map_err(session_failed)?;
                if let Err(e) = self.spawn_api(move |api| async move {
                    AppEvent::SessionStarted(api.start_study_session(&subject).await)
                }) {
                    self.sessions.release();
                    return Err(e);
                }
                Ok(Response::Silent)
            }
            "end" => {
                let id = self.sessions.active().map(|s| s.id).ok_or_else(|| session_failed(SessionError::NotActive))?;
                self.spawn_api(move |api| async move {
                    AppEvent::SessionEnded(api.end_study_session(id).await)
                })?;
                Ok(Response::Silent)
            }
            "status" => {
                let now = chrono::Local::now().naive_local();
                match (self.sessions.active(), self.sessions.elapsed_display(now)) {
                    (Some(session), Some(elapsed)) => Ok(Response::Say(format!(
                        "Studying {} for {}",
                        session.subject(),
                        elapsed
                    ))),
                    _ => Ok(Response::Say("No study session is active.".to_string())),
                }
            }
            other => Err(CommandError::InvalidArgs(format!(
                "unknown session action `{}` (start, end, status)",
                other
            ))),
        }
    }

    /// Apply a timer tick; on completion notify and close the server session
    pub fn handle_tick(&mut self, tick: TickEvent) -> Response {
        match self.timer.on_tick(tick) {
            TickOutcome::Ignored => Response::Silent,
            TickOutcome::Remaining(left) => {
                if left % 60 == 0 {
                    Response::Say(format!("{} left", self.timer.display()))
                } else {
                    Response::Silent
                }
            }
            TickOutcome::Completed => {
                self.notifier.notify(COMPLETE_TITLE, COMPLETE_BODY);
                self.log_study_session();
                Response::Say(format!("Timer done ({}).", self.timer.status_line()))
            }
        }
    }

    fn log_study_session(&mut self) {
        let Some(id) = self.sessions.active().map(|s| s.id) else {
            tracing::debug!("timer completed with no open study session");
            return;
        };
        if let Err(e) = self.spawn_api(move |api| async move {
            AppEvent::SessionEnded(api.end_study_session(id).await)
        }) {
            tracing::debug!(error = %e, "study session not logged");
        }
    }

    /// Fold a finished background request into local state
    pub fn handle_event(&mut self, event: AppEvent) -> Response {
        match event {
            AppEvent::AuthChecked(Ok(status)) => match (status.authenticated, status.user) {
                (true, Some(user)) => {
                    let name = user.display_name();
                    self.user = Some(name.clone());
                    self.signed_out = false;
                    Response::Say(format!("Signed in as {}.", name))
                }
                (true, None) => {
                    self.signed_out = false;
                    Response::Silent
                }
                (false, _) => {
                    self.user = None;
                    self.signed_out = true;
                    Response::Say("Not signed in; server commands will be refused.".to_string())
                }
            },
            AppEvent::TasksLoaded(Ok(tasks)) => {
                self.board.replace_all(tasks);
                Response::Say(self.board.render())
            }
            AppEvent::TaskUpdated(Ok(task)) => {
                let summary = task.summary();
                if self.board.apply(task) {
                    Response::Say(summary)
                } else {
                    tracing::debug!("update for a task not on the board ignored");
                    Response::Silent
                }
            }
            AppEvent::TaskDeleted { id, result: Ok(()) } => {
                if self.board.remove(id) {
                    Response::Say(format!("Deleted task #{}.", id))
                } else {
                    Response::Silent
                }
            }
            AppEvent::SessionsLoaded(Ok(sessions)) => {
                let Some(open) = sessions.into_iter().find(StudySession::is_open) else {
                    return Response::Silent;
                };
                if self.sessions.reserve().is_err() {
                    tracing::debug!(id = open.id, "open server session ignored; one is already tracked");
                    return Response::Silent;
                }
                match self.sessions.begin(open) {
                    Ok(session) => Response::Say(format!("Resuming study session: {}.", session.subject())),
                    Err(e) => Response::error(e),
                }
            }
            AppEvent::SessionStarted(Ok(session)) => match self.sessions.begin(session) {
                Ok(session) => Response::Say(format!("Started studying {}.", session.subject())),
                Err(e) => Response::error(e),
            },
            AppEvent::SessionStarted(Err(e)) => {
                self.sessions.release();
                Response::error(e)
            }
            AppEvent::SessionEnded(Ok(ended)) => {
                let closed = self.sessions.active().map(|s| s.id) == Some(ended.id);
                if closed {
                    let _ = self.sessions.finish();
                }
                let minutes = ended.duration.unwrap_or(0);
                Response::Say(format!("Logged {} minutes of {}.", minutes, ended.subject()))
            }
            AppEvent::AuthChecked(Err(e))
            | AppEvent::TasksLoaded(Err(e))
            | AppEvent::TaskUpdated(Err(e))
            | AppEvent::TaskDeleted { result: Err(e), .. }
            | AppEvent::SessionsLoaded(Err(e))
            | AppEvent::SessionEnded(Err(e)) => {
                tracing::warn!(error = %e, "server request failed");
                Response::error(e)
            }
        }
    }

    /// Apply a push from the live-update socket
    pub fn handle_server_event(&mut self, event: ServerEvent) -> Response {
        match event {
            ServerEvent::TaskUpdate { task_id, completed } => {
                let status = if completed { TaskStatus::Completed } else { TaskStatus::Pending };
                if self.board.set_status(task_id, status) {
                    Response::Say(format!("Task #{} is now {}.", task_id, status))
                } else {
                    Response::Silent
                }
            }
            ServerEvent::NewMessage { content, sender } => {
                let line = match sender {
                    Some(sender) => format!("{}: {}", sender, content),
                    None => content,
                };
                self.chat.receive(line.clone());
                Response::Say(line)
            }
            ServerEvent::Notification { title, message } => {
                self.notifier.notify(&title, &message);
                Response::Silent
            }
        }
    }

    /// Run `request` against the server in the background
    fn spawn_api<F, Fut>(&self, request: F) -> Result<(), CommandError>
    where
        F: FnOnce(Arc<dyn StudyApi>) -> Fut,
        Fut: Future<Output = AppEvent> + Send + 'static,
    {
        let api = self
            .api
            .clone()
            .ok_or_else(|| CommandError::ExecutionFailed("offline mode".to_string()))?;
        let events = self.events.clone();
        let fut = request(api);
        tokio::spawn(async move {
            let event = fut.await;
            if events.send(event).is_err() {
                tracing::debug!("app gone before request finished");
            }
        });
        Ok(())
    }
}

fn parse_task_id(args: &[String]) -> Result<i64, CommandError> {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArgs("a task id is required".to_string()))?;
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidArgs(format!("`{}` is not a task id", raw)))
}

fn session_failed(err: SessionError) -> CommandError {
    CommandError::ExecutionFailed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Notifier;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, body: &str) {
            self.seen.lock().unwrap().push((title.to_string(), body.to_string()));
        }
    }

    fn offline(timer_secs: u32) -> (App, AppChannels, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let settings = AppSettings {
            prefix: "/".to_string(),
            matcher: ResponseMatcher::default(),
            timer_secs,
            tick_period: Duration::from_secs(1),
        };
        let (app, channels) = App::new(settings, None, notifier.clone());
        (app, channels, notifier)
    }

    #[test]
    fn test_chat_reply_and_history() {
        let (mut app, _channels, _) = offline(60);
        assert_eq!(app.handle_input("thanks so much"), Response::Say("You're welcome!".to_string()));
        assert_eq!(app.handle_input("   "), Response::Silent);
        assert_eq!(
            app.handle_input("/history"),
            Response::Say("[you] thanks so much\n[naira] You're welcome!".to_string())
        );
    }

    #[test]
    fn test_unknown_command() {
        let (mut app, _channels, _) = offline(60);
        assert_eq!(
            app.handle_input("/dance"),
            Response::Say("Error: Command not found: dance".to_string())
        );
    }

    #[test]
    fn test_server_commands_refused_offline() {
        let (mut app, _channels, _) = offline(60);
        match app.handle_input("/tasks") {
            Response::Say(text) => assert!(text.starts_with("Error: Execution failed: tasks needs the Naira server")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_quit_and_strength() {
        let (mut app, _channels, _) = offline(60);
        assert_eq!(app.handle_input("/strength Correct-Horse-9"), Response::Say("Strength: 5/5".to_string()));
        assert_eq!(app.handle_input("/q"), Response::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_completion_notifies() {
        let (mut app, mut channels, notifier) = offline(2);
        assert_eq!(
            app.handle_input("/timer start"),
            Response::Say("00:02 (running) [pause] [reset]".to_string())
        );
        assert_eq!(app.handle_input("/timer start"), Response::Say("Timer is already running.".to_string()));

        let tick = channels.ticks.recv().await.unwrap();
        assert_eq!(app.handle_tick(tick), Response::Silent);
        let tick = channels.ticks.recv().await.unwrap();
        assert_eq!(app.handle_tick(tick), Response::Say("Timer done (00:00 (completed) [reset]).".to_string()));

        assert_eq!(
            notifier.seen.lock().unwrap().as_slice(),
            &[(COMPLETE_TITLE.to_string(), COMPLETE_BODY.to_string())]
        );
        assert_eq!(
            app.handle_input("/timer start"),
            Response::Say("Timer finished. Use timer reset first.".to_string())
        );
        assert_eq!(app.handle_input("/t reset"), Response::Say("00:02 (idle) [start]".to_string()));
    }

    #[test]
    fn test_live_events_update_local_state() {
        let (mut app, _channels, notifier) = offline(60);
        assert_eq!(
            app.handle_server_event(ServerEvent::TaskUpdate { task_id: 1, completed: true }),
            Response::Silent
        );

        app.board.replace_all(vec![Task::new(1, "Essay")]);
        assert_eq!(
            app.handle_server_event(ServerEvent::TaskUpdate { task_id: 1, completed: true }),
            Response::Say("Task #1 is now completed.".to_string())
        );

        app.handle_server_event(ServerEvent::Notification { title: "Due".to_string(), message: "Essay".to_string() });
        assert_eq!(notifier.seen.lock().unwrap().len(), 1);

        app.handle_server_event(ServerEvent::NewMessage { content: "Keep going!".to_string(), sender: Some("tutor".to_string()) });
        assert_eq!(app.chat().transcript(), "[naira] tutor: Keep going!");
    }

    #[test]
    fn test_bootstrap_offline_is_an_error() {
        let (app, _channels, _) = offline(60);
        assert!(matches!(app.bootstrap(), Err(CommandError::ExecutionFailed(_))));
    }

    #[test]
    fn test_parse_task_id() {
        assert_eq!(parse_task_id(&["#12".to_string()]).unwrap(), 12);
        assert!(parse_task_id(&[]).is_err());
        assert!(parse_task_id(&["abc".to_string()]).is_err());
    }
}
