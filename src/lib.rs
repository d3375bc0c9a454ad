//! Notify Hub - notification lifecycle for a Matrix chat client.
//!
//! This crate coordinates push notifications between the host's
//! notification center, the signed-in Matrix session and the app.
//!
//! # Architecture
//!
//! - **NotificationCoordinator** - owns authorization, pusher registration,
//!   presentation policy and delivered-notification cleanup
//! - **UserNotificationCenter** - host notification service adapter
//! - **ClientProxy** - signed-in session adapter (homeserver API)
//! - **SettingsStore** - persisted settings (profile tag, gateway URL)
//! - **SignalBus** - app lifecycle signals driving cleanup
//!
//! # Modules
//!
//! - [`notifications`] - coordinator, notification center seam, payloads
//! - [`client`] - session proxy and its HTTP implementation
//! - [`config`] - settings and their persistence
//! - [`device`] - device names and locale reported with pushers

pub mod client;
pub mod config;
pub mod constants;
pub mod device;
pub mod notifications;

// Re-export commonly used types
pub use client::{ClientProxy, ClientProxyError, HttpClientProxy};
pub use config::{AppSettings, FileSettingsStore, MemorySettingsStore, SettingsStore};
pub use device::DeviceInfo;
pub use notifications::{
    AppSignal, LocalNotificationCenter, NotificationCoordinator, NotificationCoordinatorDelegate,
    SignalBus, UserNotificationCenter,
};
