//! Matrix client-server implementation of [`ClientProxy`].
//!
//! Sends `POST /_matrix/client/v3/pushers/set` with the session's access
//! token. The pusher's default payload travels as a JSON object inside
//! `data`, so the string form held by [`HttpPusherData`] is parsed back
//! before sending.

// Rust guideline compliant 2026-02

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use super::{ClientProxy, ClientProxyError};
use crate::constants::HTTP_REQUEST_TIMEOUT;
use crate::notifications::pusher::{HttpPusherData, PusherKind, PusherRegistration};

/// Path of the set-pusher endpoint, relative to the homeserver base URL.
const SET_PUSHER_PATH: &str = "_matrix/client/v3/pushers/set";

/// A signed-in Matrix session reachable over HTTP.
#[derive(Debug, Clone)]
pub struct HttpClientProxy {
    client: reqwest::Client,
    homeserver: Url,
    access_token: String,
    pusher_notification_client_identifier: Option<String>,
}

impl HttpClientProxy {
    /// Creates a proxy for the session identified by `access_token`.
    ///
    /// # Arguments
    ///
    /// * `homeserver` - Base URL of the homeserver
    /// * `access_token` - Access token of the signed-in session
    pub fn new(homeserver: Url, access_token: impl Into<String>) -> Result<Self, ClientProxyError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientProxyError::Network(e.to_string()))?;

        Ok(Self::with_client(client, homeserver, access_token))
    }

    /// Creates a proxy reusing an existing HTTP client.
    pub fn with_client(
        client: reqwest::Client,
        homeserver: Url,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            homeserver,
            access_token: access_token.into(),
            pusher_notification_client_identifier: None,
        }
    }

    /// Sets the identifier placed in the pusher's default payload.
    #[must_use]
    pub fn with_notification_client_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.pusher_notification_client_identifier = Some(identifier.into());
        self
    }

    /// Homeserver base URL.
    pub fn homeserver(&self) -> &Url {
        &self.homeserver
    }

    fn endpoint(&self) -> Result<Url, ClientProxyError> {
        // Keep any path prefix the homeserver URL carries.
        let mut base = self.homeserver.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(SET_PUSHER_PATH)
            .map_err(|e| ClientProxyError::InvalidRequest(format!("Bad homeserver URL: {e}")))
    }
}

/// Build the JSON body of a set-pusher request.
pub fn set_pusher_body(registration: &PusherRegistration) -> Result<Value, ClientProxyError> {
    let data = match &registration.kind {
        PusherKind::Http(HttpPusherData {
            url,
            format,
            default_payload,
        }) => {
            let default_payload: Value = serde_json::from_str(default_payload).map_err(|e| {
                ClientProxyError::InvalidRequest(format!("Default payload is not JSON: {e}"))
            })?;
            json!({
                "url": url,
                "format": format.as_str(),
                "default_payload": default_payload,
            })
        }
        PusherKind::Email => json!({}),
    };

    Ok(json!({
        "pushkey": registration.identifiers.pushkey,
        "app_id": registration.identifiers.app_id,
        "kind": registration.kind.as_str(),
        "app_display_name": registration.app_display_name,
        "device_display_name": registration.device_display_name,
        "profile_tag": registration.profile_tag,
        "lang": registration.lang,
        "data": data,
        "append": false,
    }))
}

#[async_trait]
impl ClientProxy for HttpClientProxy {
    async fn set_pusher(&self, registration: PusherRegistration) -> Result<(), ClientProxyError> {
        let url = self.endpoint()?;
        let body = set_pusher_body(&registration)?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientProxyError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            log::info!(
                "[Pusher] Registered pusher app_id={} on {}",
                registration.identifiers.app_id,
                self.homeserver
            );
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientProxyError::Server {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn pusher_notification_client_identifier(&self) -> Option<String> {
        self.pusher_notification_client_identifier.clone()
    }
}
