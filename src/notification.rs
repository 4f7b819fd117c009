//! Desktop notices via freedesktop D-Bus, for failures that happen while the
//! sketchpad is not focused.

use std::collections::HashMap;

use thiserror::Error;
use zbus::{Connection, proxy};

use crate::predict::PredictionError;

const APP_NAME: &str = "Digitpad";
const ERROR_ICON: &str = "dialog-error";

/// D-Bus interface for freedesktop Notifications.
#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    /// Returns the notification id.
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, zbus::zvariant::Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Failed to connect to session bus: {0}")]
    Connect(#[source] zbus::Error),

    #[error("Notification service unavailable: {0}")]
    Proxy(#[source] zbus::Error),

    #[error("Failed to send notification: {0}")]
    Send(#[source] zbus::Error),
}

/// A desktop notice.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub summary: String,
    pub body: String,
    pub icon: &'static str,
    /// Milliseconds before the server hides it.
    pub timeout_ms: i32,
}

impl Notice {
    /// The notice shown when a submission fails. Carries the same text as the
    /// in-window notice.
    pub fn prediction_failed(err: &PredictionError, timeout_ms: u64) -> Self {
        Self {
            summary: "Prediction failed".to_string(),
            body: err.user_message().to_string(),
            icon: ERROR_ICON,
            timeout_ms: i32::try_from(timeout_ms).unwrap_or(i32::MAX),
        }
    }
}

/// Sends a notice over the session bus.
pub async fn send_notice(notice: &Notice) -> Result<u32, NotificationError> {
    let connection = Connection::session()
        .await
        .map_err(NotificationError::Connect)?;

    let proxy = NotificationsProxy::new(&connection)
        .await
        .map_err(NotificationError::Proxy)?;

    proxy
        .notify(
            APP_NAME,
            0,
            notice.icon,
            &notice.summary,
            &notice.body,
            vec![],
            HashMap::new(),
            notice.timeout_ms,
        )
        .await
        .map_err(NotificationError::Send)
}

/// Sends a notice in the background; failures are only logged.
pub fn send_notice_async(runtime_handle: &tokio::runtime::Handle, notice: Notice) {
    runtime_handle.spawn(async move {
        match send_notice(&notice).await {
            Ok(id) => log::debug!("Desktop notice {} sent: {}", id, notice.summary),
            Err(e) => log::warn!("{}", e),
        }
    });
}
