//! Notification lifecycle management.
//!
//! The [`NotificationCoordinator`] sits between three collaborators:
//!
//! ```text
//!                     SignalBus (room read, invites screen)
//!                             │
//!                             ▼
//! UserNotificationCenter ◄──► NotificationCoordinator ──► ClientProxy::set_pusher
//!   (host OS service)                 │
//!                                     ▼
//!                       NotificationCoordinatorDelegate (app flow)
//! ```
//!
//! # Pusher registration
//!
//! Once the user authorizes notifications the delegate obtains a push
//! token from the host and hands it to [`NotificationCoordinator::register`],
//! which builds a [`PusherRegistration`] and sends it through the session.
//!
//! # Presentation policy
//!
//! Notifications arriving in the foreground are shown in full unless the
//! delegate declines them, in which case they are suppressed entirely.
//!
//! # Cleanup
//!
//! Marking a room as read clears that room's delivered notifications;
//! opening the invites screen clears delivered invites.

// Rust guideline compliant 2026-02

pub mod center;
pub mod content;
pub mod coordinator;
pub mod local;
pub mod pusher;
pub mod signals;

pub use center::{NotificationCenterError, UserNotificationCenter, UserNotificationCenterDelegate};
pub use content::{
    AuthorizationOption, DeliveredNotification, NotificationAction, NotificationCategory,
    NotificationCategoryOption, NotificationContent, NotificationRequest, NotificationResponse, PresentationOptions,
};
pub use coordinator::{NotificationCoordinator, NotificationCoordinatorDelegate};
pub use local::LocalNotificationCenter;
pub use pusher::{ApnsPayload, HttpPusherData, PushFormat, PusherIdentifiers, PusherKind, PusherRegistration};
pub use signals::{AppSignal, SignalBus};
