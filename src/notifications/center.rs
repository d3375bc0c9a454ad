//! Host notification center abstraction.
//!
//! The notification center is the operating system service that asks the
//! user for permission, shows notifications, keeps delivered notifications
//! around and reports the user's interactions. The coordinator drives it
//! through [`UserNotificationCenter`] and receives its callbacks through
//! [`UserNotificationCenterDelegate`].
//!
//! # Architecture
//!
//! ```text
//! NotificationCoordinator ──► UserNotificationCenter (host service)
//!          ▲                          │
//!          └── UserNotificationCenterDelegate ◄── will_present / did_receive
//! ```

use async_trait::async_trait;
use std::sync::Weak;

use super::content::{
    AuthorizationOption, DeliveredNotification, NotificationCategory, NotificationRequest,
    NotificationResponse, PresentationOptions,
};

/// Errors reported by a notification center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationCenterError {
    /// The host has no notification service.
    Unavailable,
    /// The request was rejected.
    Rejected(String),
}

impl std::fmt::Display for NotificationCenterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "Notification center unavailable"),
            Self::Rejected(msg) => write!(f, "Notification request rejected: {msg}"),
        }
    }
}

impl std::error::Error for NotificationCenterError {}

/// Receives notification center callbacks.
///
/// Both callbacks are awaited by the notification center before it
/// finishes its own handling of the notification.
#[async_trait]
pub trait UserNotificationCenterDelegate: Send + Sync {
    /// A notification arrived while the app is in the foreground.
    async fn will_present(&self, notification: &DeliveredNotification) -> PresentationOptions;

    /// The user interacted with a delivered notification.
    async fn did_receive(&self, response: &NotificationResponse);
}

/// Operations the coordinator needs from the host notification center.
#[async_trait]
pub trait UserNotificationCenter: Send + Sync {
    /// Ask the user to authorize `options`. `Ok(false)` means denied.
    async fn request_authorization(
        &self,
        options: &[AuthorizationOption],
    ) -> Result<bool, NotificationCenterError>;

    /// Schedule a notification for display.
    async fn add(&self, request: NotificationRequest) -> Result<(), NotificationCenterError>;

    /// Notifications shown and still retained by the center.
    async fn delivered_notifications(
        &self,
    ) -> Result<Vec<DeliveredNotification>, NotificationCenterError>;

    /// Remove delivered notifications by request identifier.
    fn remove_delivered_notifications(&self, identifiers: &[String]);

    /// Declare the categories notifications may use, replacing earlier ones.
    fn set_notification_categories(&self, categories: Vec<NotificationCategory>);

    /// Install the single delegate receiving callbacks.
    fn set_delegate(&self, delegate: Weak<dyn UserNotificationCenterDelegate>);
}
