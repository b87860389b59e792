//! review-watch polls the homework review status API and posts status
//! changes to a Telegram chat.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};

use review_watch::channel::telegram::TelegramNotifier;
use review_watch::config::{Credentials, WatchConfig};
use review_watch::logging;
use review_watch::watch::client::PracticumClient;
use review_watch::watch::supervisor::PollSupervisor;

/// Watch a homework review and report status changes to Telegram.
#[derive(Parser)]
#[command(name = "review-watch", version, about)]
struct Cli {
    /// Path to config file.
    #[arg(long, global = true, default_value = ".review-watch/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the status endpoint until terminated (the default).
    Run {
        /// Single poll, then exit.
        #[arg(long)]
        once: bool,

        /// Seconds between polls, overriding the config file.
        #[arg(long)]
        interval: Option<u64>,

        /// Initial cursor in epoch seconds (defaults to now).
        #[arg(long)]
        from_date: Option<i64>,
    },

    /// Validate configuration and credentials, then exit.
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = WatchConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Command::Run {
        once: false,
        interval: None,
        from_date: None,
    }) {
        Command::Run {
            once,
            interval,
            from_date,
        } => cmd_run(config, once, interval, from_date).await,
        Command::Check => cmd_check(&cli.config, &config),
    }
}

/// Build the supervisor and poll.
async fn cmd_run(
    mut config: WatchConfig,
    once: bool,
    interval: Option<u64>,
    from_date: Option<i64>,
) -> Result<()> {
    let _log_guard = logging::init(&config.log).wrap_err("failed to initialize logging")?;

    if let Some(secs) = interval {
        config.poll_interval_secs = secs;
    }
    config.validate();

    let credentials = Credentials::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "cannot start without credentials");
    })?;

    let source = PracticumClient::new(
        config.endpoint.clone(),
        credentials.practicum_token.clone(),
        config.request_timeout(),
    )
    .wrap_err("failed to build status client")?;
    let notifier = TelegramNotifier::new(
        config.telegram_api_base.clone(),
        credentials.telegram_token.clone(),
        credentials.telegram_chat_id,
    )
    .wrap_err("failed to build Telegram client")?;

    let cursor = from_date.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let mut supervisor = PollSupervisor::new(
        Box::new(source),
        Box::new(notifier),
        config.poll_interval(),
        cursor,
    );

    if once {
        let report = supervisor.run_iteration().await;
        tracing::info!(
            delivery = ?report.delivery,
            cursor = supervisor.cursor(),
            "single poll finished"
        );
        return Ok(());
    }

    tokio::select! {
        _ = supervisor.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.wrap_err("failed to listen for shutdown signal")?;
            tracing::info!("review-watch stopped");
        }
    }

    Ok(())
}

/// Print the resolved configuration without polling.
fn cmd_check(path: &Path, config: &WatchConfig) -> Result<()> {
    let credentials = Credentials::from_env()?;

    if path.exists() {
        println!("Config: {}", path.display());
    } else {
        println!("Config: {} (not found, using defaults)", path.display());
    }
    println!("Endpoint: {}", config.endpoint);
    println!("Poll interval: {}s", config.poll_interval_secs);
    match config.request_timeout_secs {
        Some(secs) => println!("Request timeout: {secs}s"),
        None => println!("Request timeout: client default"),
    }
    println!("Telegram chat: {}", credentials.telegram_chat_id);
    if config.log.file.as_os_str().is_empty() {
        println!("Log file: none");
    } else {
        println!("Log file: {}", config.log.file.display());
    }
    println!("\nCredentials OK.");

    Ok(())
}
