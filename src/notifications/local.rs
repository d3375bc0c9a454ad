//! In-process notification center.
//!
//! Stands in for the OS notification service on hosts that have none (the
//! command line, headless services). Notifications are logged and kept in
//! memory; [`LocalNotificationCenter::present`] and
//! [`LocalNotificationCenter::respond`] let the host play the role of the
//! OS, routing arrivals and interactions through the installed delegate.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use super::center::{NotificationCenterError, UserNotificationCenter, UserNotificationCenterDelegate};
use super::content::{
    AuthorizationOption, DeliveredNotification, NotificationCategory, NotificationRequest,
    NotificationResponse, PresentationOptions,
};

/// Notification center that keeps delivered notifications in memory.
#[derive(Debug)]
pub struct LocalNotificationCenter {
    grant_authorization: bool,
    delivered: Mutex<Vec<DeliveredNotification>>,
    categories: Mutex<Vec<NotificationCategory>>,
    delegate: RwLock<Option<Weak<dyn UserNotificationCenterDelegate>>>,
}

impl Default for LocalNotificationCenter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LocalNotificationCenter {
    /// Creates a center answering authorization requests with `grant_authorization`.
    pub fn new(grant_authorization: bool) -> Self {
        Self {
            grant_authorization,
            delivered: Mutex::new(Vec::new()),
            categories: Mutex::new(Vec::new()),
            delegate: RwLock::new(None),
        }
    }

    /// Snapshot of the delivered notifications, oldest first.
    pub fn delivered(&self) -> Vec<DeliveredNotification> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Categories declared so far.
    pub fn categories(&self) -> Vec<NotificationCategory> {
        self.categories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn delegate(&self) -> Option<Arc<dyn UserNotificationCenterDelegate>> {
        self.delegate
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    fn deliver(&self, notification: DeliveredNotification) {
        let content = notification.content();
        log::info!(
            "[Notifications] {}{}{}",
            content.title,
            if content.subtitle.is_empty() { "" } else { " - " },
            content.subtitle
        );
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }

    /// Delivers a remote notification arriving while the app is in the
    /// foreground.
    ///
    /// The delegate decides the presentation; with no delegate everything
    /// is presented. Suppressed notifications are not retained.
    pub async fn present(&self, request: NotificationRequest) -> PresentationOptions {
        let notification = DeliveredNotification::now(request);
        let options = match self.delegate() {
            Some(delegate) => delegate.will_present(&notification).await,
            None => PresentationOptions::all(),
        };

        if options.is_empty() {
            log::debug!(
                "[Notifications] Suppressed notification {}",
                notification.identifier()
            );
        } else {
            self.deliver(notification);
        }
        options
    }

    /// Routes a user interaction to the delegate.
    pub async fn respond(&self, response: NotificationResponse) {
        if let Some(delegate) = self.delegate() {
            delegate.did_receive(&response).await;
        }
    }
}

#[async_trait]
impl UserNotificationCenter for LocalNotificationCenter {
    async fn request_authorization(
        &self,
        options: &[AuthorizationOption],
    ) -> Result<bool, NotificationCenterError> {
        log::debug!(
            "[Notifications] Authorization requested for {options:?}: granted={}",
            self.grant_authorization
        );
        Ok(self.grant_authorization)
    }

    async fn add(&self, request: NotificationRequest) -> Result<(), NotificationCenterError> {
        if !self.grant_authorization {
            return Err(NotificationCenterError::Rejected(
                "notifications are not authorized".to_string(),
            ));
        }
        self.deliver(DeliveredNotification::now(request));
        Ok(())
    }

    async fn delivered_notifications(
        &self,
    ) -> Result<Vec<DeliveredNotification>, NotificationCenterError> {
        Ok(self.delivered())
    }

    fn remove_delivered_notifications(&self, identifiers: &[String]) {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|notification| !identifiers.iter().any(|id| id == notification.identifier()));
    }

    fn set_notification_categories(&self, categories: Vec<NotificationCategory>) {
        *self.categories.lock().unwrap_or_else(PoisonError::into_inner) = categories;
    }

    fn set_delegate(&self, delegate: Weak<dyn UserNotificationCenterDelegate>) {
        *self.delegate.write().unwrap_or_else(PoisonError::into_inner) = Some(delegate);
    }
}
