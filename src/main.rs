//! Poca - a headless pomodoro timer
//!
//! This is the main entry point for the poca host.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{error, info};

use poca::{
    config::Config,
    presentation::render_line,
    services::{
        DesktopNotifier, FeedbackDevice, LogFeedback, LogNotifier, NotificationService,
        TerminalBell,
    },
    state::PomodoroTimer,
    tasks::{run_phases, TokioTicker},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("poca={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting poca v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: work={:?}, rest={:?}, phases={}",
        config.work, config.rest, config.phases
    );

    let durations = config.durations()?;

    let notifier: Arc<dyn NotificationService> = if config.desktop_notifications {
        Arc::new(DesktopNotifier::new(Handle::current()))
    } else {
        Arc::new(LogNotifier)
    };
    let feedback: Arc<dyn FeedbackDevice> = if config.bell {
        Arc::new(TerminalBell)
    } else {
        Arc::new(LogFeedback)
    };

    let timer = PomodoroTimer::new(
        durations,
        Arc::new(TokioTicker::current()),
        notifier,
        feedback,
    );
    timer.request_notification_permission().await;

    let format = config.display_format();
    let _display = timer.subscribe(move |event| {
        println!("{}", render_line(event, format));
    });

    let shutdown = async {
        match shutdown_signal().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        result = run_phases(timer.clone(), config.phases) => {
            if let Err(e) = result {
                error!("Pomodoro loop failed: {}", e);
            }
        }
        _ = shutdown => {}
    }

    timer.stop_pomodoro();
    info!("Shutdown complete");
    Ok(())
}
