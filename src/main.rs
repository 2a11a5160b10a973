use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use naira::application::app::AppSettings;
use naira::application::errors::{AppError, ConfigError};
use naira::application::{App, Response};
use naira::domain::traits::{Bot, StudyApi};
use naira::infrastructure::adapters::{ConsoleAdapter, ConsoleInput, ConsoleNotifier};
use naira::infrastructure::api::HttpStudyApi;
use naira::infrastructure::config::Config;
use naira::infrastructure::realtime::{websocket_url, LiveUpdates, ReconnectPolicy};

#[derive(Parser)]
#[command(name = "naira")]
#[command(about = "A terminal study assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "naira.yaml")]
    config: String,

    /// Server base URL (overrides config)
    #[arg(short, long)]
    server: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the assistant with server features
    Run,
    /// Chat and timer only, no server calls
    Chat,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Logs go to stderr, the transcript to stdout
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run(&cli.config, cli.server, true),
        Commands::Chat => run(&cli.config, cli.server, false),
        Commands::Version => {
            println!("naira v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str, server_override: Option<String>) -> Result<Config, AppError> {
    let mut config = if Path::new(config_path).exists() {
        match Config::load(config_path) {
            Ok(mut config) => {
                config.apply_env();
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::load_env()
            }
        }
    } else {
        Config::load_env()
    };

    if let Some(url) = server_override {
        config.server.base_url = url;
    }
    config.validate()?;
    Ok(config)
}

fn run(config_path: &str, server_override: Option<String>, online: bool) -> Result<(), AppError> {
    let config = load_config(config_path, server_override)?;
    tracing::info!("Starting naira: {}", config.bot.name);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = rt.block_on(run_console(config, online));
    rt.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn run_console(config: Config, online: bool) -> Result<(), AppError> {
    let api: Option<Arc<dyn StudyApi>> = if online {
        let api = HttpStudyApi::new(
            config.server.base_url.clone(),
            config.request_timeout(),
            config.server.token.clone(),
        )?;
        tracing::info!(url = api.base_url(), "Using Naira server");
        Some(Arc::new(api))
    } else {
        tracing::info!("Offline mode, server commands disabled");
        None
    };

    let settings = AppSettings {
        prefix: config.bot.prefix.clone(),
        matcher: config.matcher()?,
        timer_secs: config.timer.duration_secs,
        tick_period: config.tick_period(),
    };
    let (mut app, mut channels) = App::new(settings, api, Arc::new(ConsoleNotifier));

    // The sender stays alive for the whole loop so the receiver never closes
    let (live_tx, mut live_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let live_task = if online && config.realtime.enabled {
        let url = websocket_url(&config.server.base_url, &config.realtime.path)?;
        let policy = ReconnectPolicy::new(
            Duration::from_secs(config.realtime.initial_backoff_secs),
            Duration::from_secs(config.realtime.max_backoff_secs),
        );
        tracing::info!(%url, "Listening for live updates");
        Some(tokio::spawn(LiveUpdates::new(url, policy).run(live_tx.clone(), shutdown_rx)))
    } else {
        None
    };

    let bot = ConsoleAdapter::new(config.bot.name.clone());
    bot.start().await?;
    tracing::info!("Console started: {}", bot.bot_info().name);
    if app.is_online() {
        app.bootstrap()?;
    }

    let mut input = ConsoleInput::new();
    bot.prompt();

    loop {
        let (response, from_input) = tokio::select! {
            line = input.next_line() => match line {
                Some(line) => (app.handle_input(&line), true),
                None => (Response::Quit, true),
            },
            Some(tick) = channels.ticks.recv() => (app.handle_tick(tick), false),
            Some(event) = channels.events.recv() => (app.handle_event(event), false),
            Some(event) = live_rx.recv() => (app.handle_server_event(event), false),
            _ = tokio::signal::ctrl_c() => (Response::Quit, false),
        };

        match response {
            Response::Say(text) => {
                bot.send_message(&text).await?;
                bot.prompt();
            }
            Response::Silent if from_input => bot.prompt(),
            Response::Silent => {}
            Response::Quit => break,
        }
    }

    let _ = shutdown_tx.send(true);
    if let Some(task) = live_task {
        if let Err(e) = task.await {
            tracing::warn!("Live update task failed: {}", e);
        }
    }

    bot.send_message("Goodbye!").await?;
    Ok(())
}

fn init_config() -> Result<(), AppError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    println!("{}", yaml);
    println!("\nSave this to naira.yaml and adjust as needed.");
    Ok(())
}
