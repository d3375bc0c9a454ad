//! Pusher registration payloads.
//!
//! A pusher binds this device's push token to the user's account on the
//! homeserver. The homeserver forwards matching events to the push gateway
//! named in [`HttpPusherData::url`], which wakes the device.

// Rust guideline compliant 2026-02

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAYLOAD_LOC_KEY, DEFAULT_PAYLOAD_MUTABLE_CONTENT};

/// Identifies a pusher on the homeserver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PusherIdentifiers {
    /// Push token, base64 encoded.
    pub pushkey: String,
    /// App id the pusher belongs to.
    pub app_id: String,
}

impl PusherIdentifiers {
    /// Build identifiers from the raw push token bytes.
    pub fn from_token(push_token: &[u8], app_id: impl Into<String>) -> Self {
        Self {
            pushkey: encode_pushkey(push_token),
            app_id: app_id.into(),
        }
    }
}

/// Encode raw push token bytes as a pushkey (standard padded base64).
pub fn encode_pushkey(push_token: &[u8]) -> String {
    BASE64.encode(push_token)
}

/// What the push gateway receives for each notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushFormat {
    /// Only the room and event ids; the device fetches the event itself.
    EventIdOnly,
}

impl PushFormat {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PushFormat::EventIdOnly => "event_id_only",
        }
    }
}

impl std::fmt::Display for PushFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings of an HTTP pusher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpPusherData {
    /// Push gateway notify endpoint.
    pub url: String,
    /// Payload format sent to the gateway.
    pub format: PushFormat,
    /// Default payload the gateway merges into every push, as a JSON string.
    pub default_payload: String,
}

/// Transport a pusher delivers over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PusherKind {
    /// Push gateway over HTTP.
    Http(HttpPusherData),
    /// Email notifications.
    Email,
}

impl PusherKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PusherKind::Http(_) => "http",
            PusherKind::Email => "email",
        }
    }
}

/// A complete pusher registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PusherRegistration {
    /// Pushkey and app id.
    pub identifiers: PusherIdentifiers,
    /// Application name shown in the user's session list.
    pub app_display_name: String,
    /// Device name shown in the user's session list.
    pub device_display_name: String,
    /// Per-installation profile tag.
    pub profile_tag: String,
    /// Preferred language for push alerts.
    pub lang: String,
    /// Transport settings.
    pub kind: PusherKind,
}

/// Alert part of the default push payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApsAlert {
    /// Localization key of the alert body.
    #[serde(rename = "loc-key")]
    pub loc_key: String,
    /// Arguments for the localized alert body.
    #[serde(rename = "loc-args")]
    pub loc_args: Vec<String>,
}

/// `aps` dictionary of the default push payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApsInfo {
    /// Lets the device rewrite the notification before display.
    #[serde(rename = "mutable-content")]
    pub mutable_content: u8,
    /// Alert shown if the device cannot rewrite the notification.
    pub alert: ApsAlert,
}

/// Default payload attached to an HTTP pusher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApnsPayload {
    /// Platform push dictionary.
    pub aps: ApsInfo,
    /// Identifies which signed-in client a push belongs to when several
    /// accounts share a device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pusher_notification_client_identifier: Option<String>,
}

impl ApnsPayload {
    /// The default payload: mutable content with a generic localized alert.
    pub fn default_alert(pusher_notification_client_identifier: Option<String>) -> Self {
        Self {
            aps: ApsInfo {
                mutable_content: DEFAULT_PAYLOAD_MUTABLE_CONTENT,
                alert: ApsAlert {
                    loc_key: DEFAULT_PAYLOAD_LOC_KEY.to_string(),
                    loc_args: Vec::new(),
                },
            },
            pusher_notification_client_identifier,
        }
    }

    /// Serialize to the JSON string stored in [`HttpPusherData::default_payload`].
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pushkey() {
        assert_eq!(encode_pushkey(b"1234"), "MTIzNA==");
        assert_eq!(encode_pushkey(&[]), "");
    }

    #[test]
    fn test_identifiers_from_token() {
        let identifiers = PusherIdentifiers::from_token(&[0xde, 0xad, 0xbe, 0xef], "app");
        assert_eq!(identifiers.pushkey, "3q2+7w==");
        assert_eq!(identifiers.app_id, "app");
    }

    #[test]
    fn test_push_format_wire_name() {
        assert_eq!(PushFormat::EventIdOnly.as_str(), "event_id_only");
        assert_eq!(
            serde_json::to_value(PushFormat::EventIdOnly).expect("serialize"),
            serde_json::json!("event_id_only")
        );
    }

    #[test]
    fn test_default_payload_json() {
        let payload = ApnsPayload::default_alert(None);
        let value: serde_json::Value =
            serde_json::from_str(&payload.to_json_string().expect("serialize")).expect("parse");

        assert_eq!(
            value,
            serde_json::json!({
                "aps": {
                    "mutable-content": 1,
                    "alert": { "loc-key": "Notification", "loc-args": [] }
                }
            })
        );
    }

    #[test]
    fn test_default_payload_with_client_identifier() {
        let payload = ApnsPayload::default_alert(Some("client-a".to_string()));
        let json = payload.to_json_string().expect("serialize");
        assert!(json.contains("\"pusher_notification_client_identifier\":\"client-a\""));
    }

    #[test]
    fn test_pusher_kind_wire_name() {
        assert_eq!(PusherKind::Email.as_str(), "email");
        let http = PusherKind::Http(HttpPusherData {
            url: "https://push.example.com".to_string(),
            format: PushFormat::EventIdOnly,
            default_payload: "{}".to_string(),
        });
        assert_eq!(http.as_str(), "http");
    }
}
