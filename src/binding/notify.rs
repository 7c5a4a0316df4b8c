//! Non-blocking user notifications ("toasts")
//!
//! Bindings push one error toast per committed failure. Where the toast ends
//! up is the consumer's choice:
//! - [`TracingNotifier`]: routed to `tracing` (CLI, services)
//! - [`ToastLog`]: thread-safe, append-only log with optional broadcast
//!   fan-out for a UI to drain

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One transient user notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }
}

/// Sink for user notifications; must never block
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Routes toasts to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Info | ToastLevel::Success => tracing::info!("{}", toast.message),
            ToastLevel::Warning => tracing::warn!("{}", toast.message),
            ToastLevel::Error => tracing::error!("{}", toast.message),
        }
    }
}

/// A toast with its position in the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedToast {
    /// Monotonic sequence ID (for ordering)
    pub id: u64,
    pub toast: Toast,
}

/// Thread-safe, append-only toast log
#[derive(Clone)]
pub struct ToastLog {
    toasts: Arc<RwLock<Vec<LoggedToast>>>,
    next_id: Arc<AtomicU64>,
    sender: Option<broadcast::Sender<LoggedToast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self {
            toasts: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            sender: None,
        }
    }

    /// Log that also broadcasts every toast as it arrives
    pub fn new_with_broadcast() -> (Self, broadcast::Receiver<LoggedToast>) {
        let (sender, receiver) = broadcast::channel(64);
        let log = Self {
            sender: Some(sender),
            ..Self::new()
        };
        (log, receiver)
    }

    /// Append a toast, returning its ID
    pub fn push(&self, toast: Toast) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let logged = LoggedToast { id, toast };

        if let Some(sender) = &self.sender {
            // No receivers is fine; the log still keeps the toast
            let _ = sender.send(logged.clone());
        }

        self.toasts.write().push(logged);
        id
    }

    /// All toasts (cloned)
    pub fn toasts(&self) -> Vec<LoggedToast> {
        self.toasts.read().clone()
    }

    /// Messages of error toasts, oldest first
    pub fn errors(&self) -> Vec<String> {
        self.toasts
            .read()
            .iter()
            .filter(|t| t.toast.level == ToastLevel::Error)
            .map(|t| t.toast.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        self.push(toast);
    }
}

impl Default for ToastLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToastLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastLog").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toastlog_starts_empty() {
        let log = ToastLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn toastlog_push_returns_monotonic_ids() {
        let log = ToastLog::new();
        assert_eq!(log.push(Toast::info("Verifying credentials")), 0);
        assert_eq!(log.push(Toast::success("Logged in")), 1);
        assert_eq!(log.push(Toast::error("Not found")), 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn errors_filters_by_level() {
        let log = ToastLog::new();
        log.notify(Toast::warning("Session expiring"));
        log.notify(Toast::error("Not found"));
        log.notify(Toast::error("Request failed"));

        assert_eq!(log.errors(), vec!["Not found", "Request failed"]);
    }

    #[test]
    fn clones_share_the_same_log() {
        let log = ToastLog::new();
        let clone = log.clone();
        clone.notify(Toast::error("x"));
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn broadcast_delivers_pushed_toasts() {
        let (log, mut rx) = ToastLog::new_with_broadcast();
        log.push(Toast::error("Not found"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, 0);
        assert_eq!(received.toast, Toast::error("Not found"));
    }

    #[test]
    fn toast_serializes_level_snake_case() {
        let json = serde_json::to_value(Toast::error("boom")).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["message"], "boom");
    }
}
