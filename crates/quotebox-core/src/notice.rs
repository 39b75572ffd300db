//! Self-clearing notification slot
//!
//! Holds at most one message. A message disappears on its own once its
//! time-to-live has passed; posting a new message replaces the old one.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

/// How long a notice stays visible by default
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    expires_at: Instant,
}

/// Shared notification slot
///
/// Cloning yields another handle to the same slot.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    slot: Arc<Mutex<Option<Notice>>>,
    ttl: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    /// Show `message`, replacing whatever was there
    pub fn post(&self, message: impl Into<String>) {
        let notice = Notice {
            message: message.into(),
            expires_at: Instant::now() + self.ttl,
        };
        *self.lock() = Some(notice);
    }

    /// The visible message, if it has not expired yet
    pub fn current(&self) -> Option<String> {
        let mut slot = self.lock();
        match slot.as_ref() {
            Some(notice) if Instant::now() < notice.expires_at => Some(notice.message.clone()),
            Some(_) => {
                *slot = None;
                None
            }
            None => None,
        }
    }

    /// Remove the visible message
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Notice>> {
        // A poisoned slot still holds a usable Option
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
