//! Notification port interface

use async_trait::async_trait;
use thiserror::Error;

/// Notification errors
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// Severity of a transient user notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Destructive,
}

impl NoticeSeverity {
    /// Get the freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Info => "dialog-information",
            Self::Destructive => "dialog-error",
        }
    }
}

/// Port for transient user notices
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a transient message.
    ///
    /// # Arguments
    /// * `title` - The notice title
    /// * `message` - The notice body
    /// * `severity` - Informational or destructive
    async fn notify(
        &self,
        title: &str,
        message: &str,
        severity: NoticeSeverity,
    ) -> Result<(), NotificationError>;
}

/// Blanket implementation for boxed notifier types
#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        severity: NoticeSeverity,
    ) -> Result<(), NotificationError> {
        self.as_ref().notify(title, message, severity).await
    }
}
