//! Application-wide constants for notify-hub.
//!
//! Identifiers shared between the notification coordinator, the notification
//! center it drives, and the notification payloads sent by the push gateway.
//!
//! # Categories
//!
//! - **Categories**: notification category identifiers declared at startup
//! - **Actions**: action identifiers carried by notification responses
//! - **User info**: keys into a notification's user info map
//! - **Pusher**: defaults used when building a pusher registration

use std::time::Duration;

// ============================================================================
// Categories
// ============================================================================

/// Category for room message notifications.
pub const CATEGORY_MESSAGE: &str = "message";

/// Category for room invite notifications.
///
/// Delivered notifications in this category are cleared when the invites
/// screen appears.
pub const CATEGORY_INVITE: &str = "invite";

// ============================================================================
// Actions
// ============================================================================

/// Action identifier for an inline reply typed into the notification.
pub const ACTION_INLINE_REPLY: &str = "inline-reply";

/// Action identifier the notification center reports for a plain tap.
pub const ACTION_DEFAULT: &str = "default";

// ============================================================================
// User info
// ============================================================================

/// User info key holding the room identifier a notification belongs to.
pub const USER_INFO_ROOM_ID: &str = "room_id";

// ============================================================================
// Pusher
// ============================================================================

/// Localization key of the alert in the default push payload.
pub const DEFAULT_PAYLOAD_LOC_KEY: &str = "Notification";

/// `mutable-content` flag of the default push payload.
///
/// Set so the receiving device's notification extension can decrypt and
/// rewrite the alert before display.
pub const DEFAULT_PAYLOAD_MUTABLE_CONTENT: u8 = 1;

/// Language reported to the homeserver when no locale can be detected.
pub const FALLBACK_LANG: &str = "en";

/// Device name reported when the host name cannot be read.
pub const FALLBACK_DEVICE_NAME: &str = "Unknown device";

/// Capacity of the app signal broadcast channel.
///
/// Signals are rare (one per room read or screen appearance); a listener
/// that falls further behind than this loses the oldest signals.
pub const SIGNAL_CHANNEL_CAPACITY: usize = 64;

/// HTTP request timeout for homeserver calls made by `HttpClientProxy`.
///
/// The coordinator itself never times out; this bounds the one network hop
/// the bundled client proxy makes.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
