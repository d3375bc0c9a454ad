//! Notify Hub CLI - registers pushers and exercises the notification
//! coordinator from the command line.
//!
//! This is the binary entry point. See the `notify_hub` library for the
//! core functionality.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use notify_hub::{
    FileSettingsStore, HttpClientProxy, LocalNotificationCenter, NotificationCoordinator,
    SettingsStore, SignalBus,
};
use std::sync::Arc;
use url::Url;

/// Global allocator configured per M-MIMALLOC-APPS guideline.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "notify-hub")]
#[command(version)]
#[command(about = "Push notification coordinator for Matrix clients")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a push token as a pusher on the homeserver
    Register {
        /// Homeserver base URL (e.g. https://matrix.example.org)
        #[arg(long)]
        homeserver: String,
        /// Access token of the signed-in session (or NOTIFY_HUB_ACCESS_TOKEN)
        #[arg(long)]
        access_token: Option<String>,
        /// Push token as hex
        #[arg(long)]
        push_token: String,
    },
    /// Show a local notification
    Notify {
        /// Notification title
        title: String,
        /// Notification subtitle
        subtitle: Option<String>,
    },
    /// Inspect or change persisted settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the settings as JSON
    Show,
    /// Forget the pusher profile tag; a new one is generated on next register
    ResetProfileTag,
}

fn build_coordinator(
    settings: Arc<FileSettingsStore>,
    center: Arc<LocalNotificationCenter>,
) -> Arc<NotificationCoordinator> {
    let coordinator = NotificationCoordinator::new(center, settings, SignalBus::new());
    coordinator.start();
    coordinator
}

async fn register(homeserver: &str, access_token: Option<String>, push_token: &str) -> Result<()> {
    let access_token = match access_token {
        Some(token) => token,
        None => std::env::var("NOTIFY_HUB_ACCESS_TOKEN")
            .context("No access token: pass --access-token or set NOTIFY_HUB_ACCESS_TOKEN")?,
    };
    let homeserver = Url::parse(homeserver).context("Invalid homeserver URL")?;
    let push_token = data_encoding::HEXLOWER_PERMISSIVE
        .decode(push_token.trim().as_bytes())
        .context("Push token must be hex")?;

    let settings = Arc::new(FileSettingsStore::open_default()?);
    let coordinator = build_coordinator(settings, Arc::new(LocalNotificationCenter::default()));
    coordinator.set_user_session(Arc::new(HttpClientProxy::new(homeserver, access_token)?));

    if !coordinator.register(&push_token).await {
        anyhow::bail!("Pusher registration failed (see log for details)");
    }
    println!("Pusher registered.");
    coordinator.stop();
    Ok(())
}

async fn notify(title: &str, subtitle: Option<&str>) -> Result<()> {
    let settings = Arc::new(FileSettingsStore::open_default()?);
    let center = Arc::new(LocalNotificationCenter::default());
    let coordinator = build_coordinator(settings, Arc::clone(&center));

    if !coordinator.request_authorization().await {
        anyhow::bail!("Notifications are not authorized");
    }
    coordinator.show_local_notification(title, subtitle).await;

    for notification in center.delivered() {
        println!("{}", serde_json::to_string(notification.content())?);
    }
    coordinator.stop();
    Ok(())
}

fn settings(action: SettingsAction) -> Result<()> {
    let store = FileSettingsStore::open_default()?;
    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        }
        SettingsAction::ResetProfileTag => {
            store.set_pusher_profile_tag(None)?;
            println!("Pusher profile tag cleared ({}).", store.path().display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Register {
            homeserver,
            access_token,
            push_token,
        } => register(&homeserver, access_token, &push_token).await,
        Commands::Notify { title, subtitle } => notify(&title, subtitle.as_deref()).await,
        Commands::Settings { action } => settings(action),
    }
}
