//! Notification data exchanged with the notification center.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{ACTION_DEFAULT, USER_INFO_ROOM_ID};

/// Content of a notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    /// Title line.
    pub title: String,
    /// Subtitle line, empty when unset.
    #[serde(default)]
    pub subtitle: String,
    /// Body text.
    #[serde(default)]
    pub body: String,
    /// Category the notification belongs to (see `constants::CATEGORY_*`).
    #[serde(default)]
    pub category_identifier: String,
    /// Arbitrary payload carried with the notification.
    #[serde(default)]
    pub user_info: Map<String, Value>,
}

impl NotificationContent {
    /// Room the notification belongs to, if its user info names one.
    pub fn room_id(&self) -> Option<&str> {
        self.user_info.get(USER_INFO_ROOM_ID).and_then(Value::as_str)
    }
}

/// A request to show a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Unique identifier; used to remove the notification later.
    pub identifier: String,
    /// What to show.
    pub content: NotificationContent,
}

/// A notification the notification center has shown and still retains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveredNotification {
    /// The request that produced it.
    pub request: NotificationRequest,
    /// When it was delivered.
    pub date: DateTime<Utc>,
}

impl DeliveredNotification {
    /// Wrap a request delivered now.
    pub fn now(request: NotificationRequest) -> Self {
        Self {
            request,
            date: Utc::now(),
        }
    }

    /// Identifier of the underlying request.
    pub fn identifier(&self) -> &str {
        &self.request.identifier
    }

    /// Content of the underlying request.
    pub fn content(&self) -> &NotificationContent {
        &self.request.content
    }
}

/// The user's interaction with a delivered notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationResponse {
    /// Which action the user picked (see `constants::ACTION_*`).
    pub action_identifier: String,
    /// The notification interacted with.
    pub notification: DeliveredNotification,
    /// Text typed into a text-input action.
    pub user_text: Option<String>,
}

impl NotificationResponse {
    /// A plain tap on `notification`.
    pub fn tap(notification: DeliveredNotification) -> Self {
        Self {
            action_identifier: ACTION_DEFAULT.to_string(),
            notification,
            user_text: None,
        }
    }
}

/// An action button offered on a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    /// Identifier reported back in [`NotificationResponse::action_identifier`].
    pub identifier: String,
    /// Button title.
    pub title: String,
    /// Whether the action collects text input.
    pub text_input: bool,
}

/// A notification category and the actions it offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCategory {
    /// Category identifier.
    pub identifier: String,
    /// Actions shown with notifications of this category.
    pub actions: Vec<NotificationAction>,
    /// Intents the category is associated with.
    pub intent_identifiers: Vec<String>,
    /// Behavior flags for the category.
    pub options: Vec<NotificationCategoryOption>,
}

/// Category behavior flags understood by the notification center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationCategoryOption {
    /// Report explicit dismissals back through the delegate.
    CustomDismissAction,
    /// Show the title when previews are hidden.
    HiddenPreviewsShowTitle,
    /// Show the subtitle when previews are hidden.
    HiddenPreviewsShowSubtitle,
}

impl NotificationCategory {
    /// A category with no actions, no intents and no options.
    pub fn actionless(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            actions: Vec::new(),
            intent_identifiers: Vec::new(),
            options: Vec::new(),
        }
    }
}

/// Authorization the app asks the user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorizationOption {
    /// Display alerts.
    Alert,
    /// Play sounds.
    Sound,
    /// Badge the app icon.
    Badge,
}

/// How a notification arriving in the foreground is presented.
///
/// An empty set suppresses the notification entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentationOptions {
    /// Update the app badge.
    pub badge: bool,
    /// Play the notification sound.
    pub sound: bool,
    /// Keep it in the notification list.
    pub list: bool,
    /// Show a banner.
    pub banner: bool,
}

impl PresentationOptions {
    /// Badge, sound, list and banner.
    pub const fn all() -> Self {
        Self {
            badge: true,
            sound: true,
            list: true,
            banner: true,
        }
    }

    /// Nothing: the notification is not presented.
    pub const fn none() -> Self {
        Self {
            badge: false,
            sound: false,
            list: false,
            banner: false,
        }
    }

    /// Whether no presentation is requested.
    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content_with(user_info: Value) -> NotificationContent {
        NotificationContent {
            user_info: user_info.as_object().cloned().unwrap_or_default(),
            ..NotificationContent::default()
        }
    }

    #[test]
    fn test_room_id_from_user_info() {
        let content = content_with(json!({ "room_id": "!room:example.org" }));
        assert_eq!(content.room_id(), Some("!room:example.org"));
    }

    #[test]
    fn test_room_id_wrong_type_is_none() {
        assert_eq!(content_with(json!({ "room_id": 42 })).room_id(), None);
        assert_eq!(content_with(json!({})).room_id(), None);
    }

    #[test]
    fn test_presentation_options() {
        assert!(PresentationOptions::none().is_empty());
        assert!(!PresentationOptions::all().is_empty());
        assert_eq!(PresentationOptions::default(), PresentationOptions::none());
    }

    #[test]
    fn test_actionless_category_has_no_options() {
        let category = NotificationCategory::actionless("message");
        assert_eq!(category.identifier, "message");
        assert!(category.actions.is_empty());
        assert!(category.intent_identifiers.is_empty());
        assert!(category.options.is_empty());
        assert_ne!(
            category,
            NotificationCategory {
                options: vec![NotificationCategoryOption::CustomDismissAction],
                ..NotificationCategory::actionless("message")
            }
        );
    }

    #[test]
    fn test_tap_response_uses_default_action() {
        let delivered = DeliveredNotification::now(NotificationRequest {
            identifier: "n1".to_string(),
            content: NotificationContent::default(),
        });
        let response = NotificationResponse::tap(delivered);
        assert_eq!(response.action_identifier, ACTION_DEFAULT);
        assert!(response.user_text.is_none());
        assert_eq!(response.notification.identifier(), "n1");
    }
}
