//! Application settings and their persistence.
//!
//! [`AppSettings`] holds everything the notification coordinator reads from
//! persistent storage: the per-installation pusher profile tag, the pusher
//! app id and the push gateway URL. The coordinator only sees the
//! [`SettingsStore`] trait; two stores are provided:
//!
//! - [`MemorySettingsStore`] - process-local, for embedding and tests
//! - [`FileSettingsStore`] - JSON file in the config directory, written on
//!   every change

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use url::Url;

/// Default push gateway the homeserver forwards events to.
const DEFAULT_PUSH_GATEWAY_URL: &str = "https://matrix.org/_matrix/push/v1/notify";

/// Default pusher app id.
const DEFAULT_PUSHER_APP_ID: &str = "com.notifyhub.app";

/// Default bundle display name used for the pusher's app display name.
const DEFAULT_BUNDLE_DISPLAY_NAME: &str = "Notify Hub";

/// File name of the persisted settings inside the config directory.
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Persisted application settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AppSettings {
    /// Stable per-installation tag distinguishing this device's pusher.
    ///
    /// Generated lazily on the first pusher registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pusher_profile_tag: Option<String>,
    /// App id the pusher is registered under.
    pub pusher_app_id: String,
    /// Push gateway the homeserver sends notifications to.
    ///
    /// Kept exactly as configured; validated as an absolute URL on load.
    pub push_gateway_base_url: String,
    /// Human-readable application name.
    pub bundle_display_name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            pusher_profile_tag: None,
            pusher_app_id: DEFAULT_PUSHER_APP_ID.to_string(),
            push_gateway_base_url: DEFAULT_PUSH_GATEWAY_URL.to_string(),
            bundle_display_name: DEFAULT_BUNDLE_DISPLAY_NAME.to_string(),
        }
    }
}

impl AppSettings {
    /// Returns the configuration directory path, creating it if necessary.
    ///
    /// Directory selection priority:
    /// 1. `NOTIFY_HUB_CONFIG_DIR` env var: explicit override
    /// 2. Default: platform config dir (macOS: ~/Library/Application Support/notify-hub)
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if let Ok(custom_dir) = std::env::var("NOTIFY_HUB_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("notify-hub")
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// Environment overrides are not applied; see [`with_env_overrides`](Self::with_env_overrides).
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings: Self = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file {}", path.display()))?
        } else {
            Self::default()
        };
        Url::parse(&settings.push_gateway_base_url).with_context(|| {
            format!(
                "Invalid push gateway URL {:?} in {}",
                settings.push_gateway_base_url,
                path.display()
            )
        })?;
        Ok(settings)
    }

    /// Writes settings as pretty JSON to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Copy of these settings with `NOTIFY_HUB_PUSHER_APP_ID` and
    /// `NOTIFY_HUB_PUSH_GATEWAY_URL` applied.
    ///
    /// The result is a read view; it is never written back to disk.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(app_id) = std::env::var("NOTIFY_HUB_PUSHER_APP_ID") {
            self.pusher_app_id = app_id;
        }

        if let Ok(gateway) = std::env::var("NOTIFY_HUB_PUSH_GATEWAY_URL") {
            match Url::parse(&gateway) {
                Ok(_) => self.push_gateway_base_url = gateway,
                Err(e) => log::warn!("Ignoring invalid NOTIFY_HUB_PUSH_GATEWAY_URL {gateway:?}: {e}"),
            }
        }
        self
    }
}

/// Settings the notification coordinator reads and writes.
///
/// Implementations must be safe to call from concurrent tasks. Each call is
/// an independent read or write; callers needing read-modify-write atomicity
/// serialize it themselves.
pub trait SettingsStore: Send + Sync {
    /// Current pusher profile tag, if one has been generated.
    fn pusher_profile_tag(&self) -> Option<String>;

    /// Replace the pusher profile tag and persist it.
    ///
    /// Called from async code while the coordinator serializes tag
    /// generation, so persistence should be a single small write.
    fn set_pusher_profile_tag(&self, tag: Option<String>) -> Result<()>;

    /// App id to register pushers under.
    fn pusher_app_id(&self) -> String;

    /// Push gateway the homeserver should deliver to.
    fn push_gateway_base_url(&self) -> String;

    /// Human-readable application name.
    fn bundle_display_name(&self) -> String;
}

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RwLock<AppSettings>,
}

impl MemorySettingsStore {
    /// Create a store seeded with `settings`.
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Snapshot of the current settings.
    pub fn snapshot(&self) -> AppSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn pusher_profile_tag(&self) -> Option<String> {
        self.snapshot().pusher_profile_tag
    }

    fn set_pusher_profile_tag(&self, tag: Option<String>) -> Result<()> {
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .pusher_profile_tag = tag;
        Ok(())
    }

    fn pusher_app_id(&self) -> String {
        self.snapshot().pusher_app_id
    }

    fn push_gateway_base_url(&self) -> String {
        self.snapshot().push_gateway_base_url
    }

    fn bundle_display_name(&self) -> String {
        self.snapshot().bundle_display_name
    }
}

/// Settings store backed by a JSON file.
///
/// Settings are read once on open and cached as stored on disk; every
/// write goes to disk and then to the cache while holding the write lock,
/// so the file always matches the last successful write. Environment
/// overrides apply to reads only and never reach the file.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    stored: RwLock<AppSettings>,
}

impl FileSettingsStore {
    /// Open the settings file in the default config directory.
    pub fn open_default() -> Result<Self> {
        let path = AppSettings::config_dir()?.join(SETTINGS_FILE_NAME);
        Self::open(path)
    }

    /// Open (or start) the settings file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = AppSettings::load_from(&path)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(Self {
            path,
            stored: RwLock::new(settings),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the effective settings, environment overrides applied.
    pub fn snapshot(&self) -> AppSettings {
        self.stored_snapshot().with_env_overrides()
    }

    /// Snapshot of the settings as stored on disk.
    pub fn stored_snapshot(&self) -> AppSettings {
        self.stored
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsStore for FileSettingsStore {
    fn pusher_profile_tag(&self) -> Option<String> {
        self.snapshot().pusher_profile_tag
    }

    fn set_pusher_profile_tag(&self, tag: Option<String>) -> Result<()> {
        let mut stored = self.stored.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = stored.clone();
        updated.pusher_profile_tag = tag;
        updated.save_to(&self.path)?;
        *stored = updated;
        Ok(())
    }

    fn pusher_app_id(&self) -> String {
        self.snapshot().pusher_app_id
    }

    fn push_gateway_base_url(&self) -> String {
        self.snapshot().push_gateway_base_url
    }

    fn bundle_display_name(&self) -> String {
        self.snapshot().bundle_display_name
    }
}
