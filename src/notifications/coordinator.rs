//! Notification coordinator.
//!
//! Single authority over notification authorization, pusher registration,
//! foreground presentation policy and delivered-notification cleanup.
//!
//! # Lifecycle
//!
//! ```text
//! idle ──start()──► ready, no session ──set_user_session()──► ready, active session
//!   ▲                                                               │
//!   └──────────────────────────── stop() ───────────────────────────┘
//! ```
//!
//! Calls made before a session is set are tolerated: `register` returns
//! `false` and everything else works without one.
//!
//! # Concurrency
//!
//! Every method may be called concurrently from host callbacks, signal
//! handling and UI code. The session and delegate slots are replaced
//! atomically and read by cloning out, so no lock is held across an
//! `.await`. Overlapping `register` calls are independent; the last
//! homeserver response wins. Only profile tag generation is serialized.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::center::{UserNotificationCenter, UserNotificationCenterDelegate};
use super::content::{
    AuthorizationOption, DeliveredNotification, NotificationCategory, NotificationContent,
    NotificationRequest, NotificationResponse, PresentationOptions,
};
use super::pusher::{
    ApnsPayload, HttpPusherData, PushFormat, PusherIdentifiers, PusherKind, PusherRegistration,
};
use super::signals::{AppSignal, SignalBus};
use crate::client::{ClientProxy, ClientProxyError};
use crate::config::SettingsStore;
use crate::constants::{ACTION_INLINE_REPLY, CATEGORY_INVITE, CATEGORY_MESSAGE};
use crate::device::DeviceInfo;

/// Options requested from the user by [`NotificationCoordinator::request_authorization`].
pub const AUTHORIZATION_OPTIONS: [AuthorizationOption; 3] = [
    AuthorizationOption::Alert,
    AuthorizationOption::Sound,
    AuthorizationOption::Badge,
];

/// Receives the coordinator's decisions and routed interactions.
///
/// Usually implemented by the app's flow controller. The coordinator holds
/// it weakly; once the implementer is dropped the coordinator behaves as if
/// no delegate were set.
#[async_trait]
pub trait NotificationCoordinatorDelegate: Send + Sync {
    /// Authorization was granted; obtain a push token and call
    /// [`NotificationCoordinator::register`] with it.
    fn register_for_remote_notifications(&self);

    /// The session ended; stop receiving remote notifications.
    fn unregister_for_remote_notifications(&self);

    /// Whether a notification arriving in the foreground should be shown.
    fn should_display_in_app_notification(&self, content: &NotificationContent) -> bool;

    /// The user tapped a notification.
    async fn notification_tapped(&self, content: &NotificationContent);

    /// The user replied inline to a notification.
    async fn handle_inline_reply(&self, content: &NotificationContent, reply_text: &str);
}

/// Coordinates notifications between the notification center, the signed-in
/// session and the app.
pub struct NotificationCoordinator {
    center: Arc<dyn UserNotificationCenter>,
    settings: Arc<dyn SettingsStore>,
    signals: SignalBus,
    device: DeviceInfo,
    session: RwLock<Option<Arc<dyn ClientProxy>>>,
    delegate: RwLock<Option<Weak<dyn NotificationCoordinatorDelegate>>>,
    /// Signal listener task; `Some` while started.
    listener: Mutex<Option<JoinHandle<()>>>,
    profile_tag_lock: Mutex<()>,
}

impl std::fmt::Debug for NotificationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCoordinator")
            .field("device", &self.device)
            .field("has_user_session", &self.has_user_session())
            .field("has_delegate", &self.delegate().is_some())
            .field("is_started", &self.is_started())
            .finish_non_exhaustive()
    }
}

impl NotificationCoordinator {
    /// Creates a coordinator describing the current host device.
    pub fn new(
        center: Arc<dyn UserNotificationCenter>,
        settings: Arc<dyn SettingsStore>,
        signals: SignalBus,
    ) -> Arc<Self> {
        let device = DeviceInfo::current(&settings.bundle_display_name());
        Self::with_device_info(center, settings, signals, device)
    }

    /// Creates a coordinator with an explicit device description.
    pub fn with_device_info(
        center: Arc<dyn UserNotificationCenter>,
        settings: Arc<dyn SettingsStore>,
        signals: SignalBus,
        device: DeviceInfo,
    ) -> Arc<Self> {
        Arc::new(Self {
            center,
            settings,
            signals,
            device,
            session: RwLock::new(None),
            delegate: RwLock::new(None),
            listener: Mutex::new(None),
            profile_tag_lock: Mutex::new(()),
        })
    }

    /// Starts the coordinator.
    ///
    /// Installs the coordinator as the notification center's delegate,
    /// declares the `message` and `invite` categories and subscribes to the
    /// app signal bus. Calling it again while started does nothing.
    ///
    /// Must be called from within a Tokio runtime: the signal listener runs
    /// as a spawned task.
    pub fn start(self: &Arc<Self>) {
        let mut listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        if listener.is_some() {
            log::debug!("[Notifications] Coordinator already started");
            return;
        }

        let weak_self: Weak<Self> = Arc::downgrade(self);
        let center_delegate: Weak<dyn UserNotificationCenterDelegate> = weak_self;
        self.center.set_delegate(center_delegate);

        self.center.set_notification_categories(vec![
            NotificationCategory::actionless(CATEGORY_MESSAGE),
            NotificationCategory::actionless(CATEGORY_INVITE),
        ]);

        let rx = self.signals.subscribe();
        *listener = Some(tokio::spawn(Self::listen(Arc::downgrade(self), rx)));

        log::info!("[Notifications] Coordinator started");
    }

    /// Stops listening for app signals.
    ///
    /// The notification center keeps its delegate and categories. A later
    /// [`start`](Self::start) subscribes again.
    pub fn stop(&self) {
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            handle.abort();
            log::info!("[Notifications] Coordinator stopped");
        }
    }

    /// Whether the coordinator is listening for app signals.
    pub fn is_started(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // =========================================================================
    // Session and delegate
    // =========================================================================

    /// Associates the signed-in session. Replaces any previous session.
    pub fn set_user_session(&self, session: Arc<dyn ClientProxy>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        log::debug!("[Notifications] User session set");
    }

    /// Forgets the signed-in session and asks the delegate to stop
    /// receiving remote notifications.
    pub fn clear_user_session(&self) {
        let previous = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if previous.is_some() {
            log::debug!("[Notifications] User session cleared");
            if let Some(delegate) = self.delegate() {
                delegate.unregister_for_remote_notifications();
            }
        }
    }

    /// Whether a session is set.
    pub fn has_user_session(&self) -> bool {
        self.session().is_some()
    }

    fn session(&self) -> Option<Arc<dyn ClientProxy>> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs the delegate, held weakly.
    pub fn set_delegate(&self, delegate: Weak<dyn NotificationCoordinatorDelegate>) {
        *self.delegate.write().unwrap_or_else(PoisonError::into_inner) = Some(delegate);
    }

    /// Removes the delegate.
    pub fn clear_delegate(&self) {
        *self.delegate.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The delegate, if set and still alive.
    pub fn delegate(&self) -> Option<Arc<dyn NotificationCoordinatorDelegate>> {
        self.delegate
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    // =========================================================================
    // Authorization and registration
    // =========================================================================

    /// Asks the user to authorize alerts, sounds and badges.
    ///
    /// On grant the delegate is told to register for remote notifications.
    /// Denial and errors end here; nothing is retried. Returns whether
    /// authorization was granted.
    pub async fn request_authorization(&self) -> bool {
        match self.center.request_authorization(&AUTHORIZATION_OPTIONS).await {
            Ok(true) => {
                log::info!("[Notifications] Permission granted");
                if let Some(delegate) = self.delegate() {
                    delegate.register_for_remote_notifications();
                }
                true
            }
            Ok(false) => {
                log::info!("[Notifications] Permission denied");
                false
            }
            Err(e) => {
                log::error!("[Notifications] Request authorization failed: {e}");
                false
            }
        }
    }

    /// Registers `push_token` as a pusher with the current session.
    ///
    /// Returns `true` once the homeserver accepted the pusher and `false` on
    /// any failure. Failures are logged, not returned: the caller decides
    /// whether to retry.
    pub async fn register(&self, push_token: &[u8]) -> bool {
        match self.set_pusher(push_token).await {
            Ok(()) => {
                log::info!("[Notifications] Set pusher succeeded");
                true
            }
            Err(e) => {
                log::error!("[Notifications] Set pusher failed: {e:#}");
                false
            }
        }
    }

    async fn set_pusher(&self, push_token: &[u8]) -> Result<()> {
        let session = self.session().ok_or(ClientProxyError::NoSession)?;
        let registration = self.pusher_registration(
            push_token,
            session.pusher_notification_client_identifier(),
        )?;
        session.set_pusher(registration).await?;
        Ok(())
    }

    /// Builds the pusher registration for `push_token`.
    ///
    /// Generates and persists the profile tag if this installation has none.
    pub fn pusher_registration(
        &self,
        push_token: &[u8],
        pusher_notification_client_identifier: Option<String>,
    ) -> Result<PusherRegistration> {
        let default_payload = ApnsPayload::default_alert(pusher_notification_client_identifier)
            .to_json_string()
            .context("Failed to serialize default push payload")?;

        Ok(PusherRegistration {
            identifiers: PusherIdentifiers::from_token(push_token, self.settings.pusher_app_id()),
            app_display_name: self.device.app_display_name.clone(),
            device_display_name: self.device.device_display_name.clone(),
            profile_tag: self.pusher_profile_tag()?,
            lang: self.device.lang.clone(),
            kind: PusherKind::Http(HttpPusherData {
                url: self.settings.push_gateway_base_url(),
                format: PushFormat::EventIdOnly,
                default_payload,
            }),
        })
    }

    /// The stored profile tag, generating and persisting one if absent.
    ///
    /// The settings write runs synchronously under `profile_tag_lock`; it
    /// happens at most once per installation.
    fn pusher_profile_tag(&self) -> Result<String> {
        let _guard = self
            .profile_tag_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(tag) = self.settings.pusher_profile_tag() {
            return Ok(tag);
        }

        let tag = Uuid::new_v4().to_string();
        self.settings
            .set_pusher_profile_tag(Some(tag.clone()))
            .context("Failed to persist pusher profile tag")?;
        log::info!("[Notifications] Generated pusher profile tag");
        Ok(tag)
    }

    // =========================================================================
    // Local notifications
    // =========================================================================

    /// Shows a notification generated on this device.
    pub async fn show_local_notification(&self, title: &str, subtitle: Option<&str>) {
        let request = NotificationRequest {
            identifier: Uuid::new_v4().to_string(),
            content: NotificationContent {
                title: title.to_string(),
                subtitle: subtitle.unwrap_or_default().to_string(),
                ..NotificationContent::default()
            },
        };

        match self.center.add(request).await {
            Ok(()) => log::info!("[Notifications] Show local notification succeeded"),
            Err(e) => log::error!("[Notifications] Show local notification failed: {e}"),
        }
    }

    // =========================================================================
    // Delivered-notification cleanup
    // =========================================================================

    async fn listen(coordinator: Weak<Self>, mut rx: broadcast::Receiver<AppSignal>) {
        loop {
            let signal = match rx.recv().await {
                Ok(signal) => signal,
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("[Notifications] Signal listener lagged, skipped {skipped} signals");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let Some(coordinator) = coordinator.upgrade() else {
                break;
            };
            coordinator.handle_signal(signal).await;
        }
        log::debug!("[Notifications] Signal listener exited");
    }

    async fn handle_signal(&self, signal: AppSignal) {
        match signal {
            AppSignal::RoomMarkedAsRead(Some(Value::String(room_id))) => {
                self.remove_delivered(|notification| {
                    notification.content().room_id() == Some(room_id.as_str())
                })
                .await;
            }
            // Missing or non-string payloads carry no room to clean up.
            AppSignal::RoomMarkedAsRead(_) => {}
            AppSignal::InvitesScreenAppeared => {
                self.remove_delivered(|notification| {
                    notification.content().category_identifier == CATEGORY_INVITE
                })
                .await;
            }
        }
    }

    /// Removes every delivered notification matching `predicate`.
    ///
    /// Best effort: a failed fetch drops the cleanup.
    async fn remove_delivered<F>(&self, predicate: F)
    where
        F: Fn(&DeliveredNotification) -> bool + Send,
    {
        let delivered = match self.center.delivered_notifications().await {
            Ok(delivered) => delivered,
            Err(e) => {
                log::debug!("[Notifications] Could not fetch delivered notifications: {e}");
                return;
            }
        };

        let identifiers: Vec<String> = delivered
            .iter()
            .filter(|&notification| predicate(notification))
            .map(|notification| notification.identifier().to_string())
            .collect();

        log::debug!(
            "[Notifications] Removing {} delivered notifications",
            identifiers.len()
        );
        self.center.remove_delivered_notifications(&identifiers);
    }
}

impl Drop for NotificationCoordinator {
    fn drop(&mut self) {
        let listener = self
            .listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = listener {
            handle.abort();
        }
    }
}

#[async_trait]
impl UserNotificationCenterDelegate for NotificationCoordinator {
    async fn will_present(&self, notification: &DeliveredNotification) -> PresentationOptions {
        let Some(delegate) = self.delegate() else {
            return PresentationOptions::all();
        };

        if delegate.should_display_in_app_notification(notification.content()) {
            PresentationOptions::all()
        } else {
            PresentationOptions::none()
        }
    }

    async fn did_receive(&self, response: &NotificationResponse) {
        let Some(delegate) = self.delegate() else {
            log::debug!("[Notifications] No delegate for notification response");
            return;
        };

        let content = response.notification.content();
        match (
            response.action_identifier.as_str(),
            response.user_text.as_deref(),
        ) {
            (ACTION_INLINE_REPLY, Some(reply_text)) if !reply_text.is_empty() => {
                delegate.handle_inline_reply(content, reply_text).await;
            }
            _ => delegate.notification_tapped(content).await,
        }
    }
}
