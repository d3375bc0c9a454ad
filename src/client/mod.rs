//! Client/session proxy used for pusher registration.
//!
//! The coordinator only needs one thing from the signed-in session: a way
//! to send a pusher registration to the homeserver. [`ClientProxy`] is that
//! seam; [`HttpClientProxy`] implements it against the Matrix
//! client-server API.

pub mod http;

use async_trait::async_trait;

use crate::notifications::pusher::PusherRegistration;

pub use http::HttpClientProxy;

/// Errors a client proxy reports for a pusher registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientProxyError {
    /// The request never got a response.
    Network(String),
    /// The homeserver answered with a non-success status.
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
    /// The registration could not be turned into a request.
    InvalidRequest(String),
    /// No signed-in session to register with.
    NoSession,
}

impl std::fmt::Display for ClientProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {msg}"),
            Self::Server { status, body } => write!(f, "Server error (HTTP {status}): {body}"),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            Self::NoSession => write!(f, "No active session"),
        }
    }
}

impl std::error::Error for ClientProxyError {}

/// The signed-in session, as seen by the notification coordinator.
#[async_trait]
pub trait ClientProxy: Send + Sync {
    /// Create or update the pusher described by `registration`.
    async fn set_pusher(&self, registration: PusherRegistration) -> Result<(), ClientProxyError>;

    /// Identifier that lets the push gateway's payload name this client
    /// when several accounts share a device.
    fn pusher_notification_client_identifier(&self) -> Option<String> {
        None
    }
}
