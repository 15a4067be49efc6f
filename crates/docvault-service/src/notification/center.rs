//! In-process notice list.
//!
//! Transient notices expire on their own; persistent ones stay until the
//! user dismisses them. A partially failed upload is always persistent.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use docvault_core::types::NoticeId;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Something succeeded
    Success,
    /// Informational
    Info,
    /// Something failed
    Error,
}

impl NoticeLevel {
    /// Convert to string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Notice ID.
    pub id: NoticeId,
    /// Severity.
    pub level: NoticeLevel,
    /// Summary text.
    pub message: String,
    /// File names the notice is about.
    pub files: Vec<String>,
    /// Kept until dismissed.
    pub persistent: bool,
    /// When the notice was raised.
    pub created_at: DateTime<Utc>,
    /// When a transient notice disappears.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Notice {
    /// Whether the notice is still shown at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expiry| now < expiry)
    }
}

/// Holds the notices currently on screen.
#[derive(Debug)]
pub struct NotificationCenter {
    transient_ttl: Duration,
    notices: Mutex<Vec<Notice>>,
}

impl NotificationCenter {
    /// Create a center whose transient notices live `transient_seconds`.
    pub fn new(transient_seconds: u64) -> Self {
        Self {
            transient_ttl: i64::try_from(transient_seconds)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Raise a notice that expires on its own.
    pub fn transient(&self, level: NoticeLevel, message: impl Into<String>) -> NoticeId {
        let now = Utc::now();
        let notice = Notice {
            id: NoticeId::new(),
            level,
            message: message.into(),
            files: Vec::new(),
            persistent: false,
            created_at: now,
            expires_at: now.checked_add_signed(self.transient_ttl),
        };
        info!(notice_id = %notice.id, level = level.as_str(), message = %notice.message, "Notice raised");
        self.push(notice)
    }

    /// Raise a notice that stays until dismissed.
    pub fn persistent(
        &self,
        level: NoticeLevel,
        message: impl Into<String>,
        files: Vec<String>,
    ) -> NoticeId {
        let notice = Notice {
            id: NoticeId::new(),
            level,
            message: message.into(),
            files,
            persistent: true,
            created_at: Utc::now(),
            expires_at: None,
        };
        warn!(
            notice_id = %notice.id,
            level = level.as_str(),
            files = notice.files.len(),
            message = %notice.message,
            "Persistent notice raised"
        );
        self.push(notice)
    }

    /// Stores `notice`, dropping whatever expired before it was raised.
    fn push(&self, notice: Notice) -> NoticeId {
        let id = notice.id;
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        let expired = drop_expired(&mut notices, notice.created_at);
        if expired > 0 {
            debug!(expired, "Expired notices dropped");
        }
        notices.push(notice);
        id
    }

    /// Notices shown right now, oldest first.
    ///
    /// Expired notices are dropped from the list on the way.
    pub fn active(&self) -> Vec<Notice> {
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        drop_expired(&mut notices, Utc::now());
        notices.clone()
    }

    /// Notices shown at `now`, oldest first.
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Notice> {
        let notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices
            .iter()
            .filter(|notice| notice.is_active_at(now))
            .cloned()
            .collect()
    }

    /// Remove a notice. Returns false if it was not there.
    pub fn dismiss(&self, id: NoticeId) -> bool {
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        let before = notices.len();
        notices.retain(|notice| notice.id != id);
        let removed = notices.len() != before;
        debug!(notice_id = %id, removed, "Notice dismissed");
        removed
    }

    /// Drop expired transient notices. Returns how many were dropped.
    pub fn prune(&self) -> usize {
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        drop_expired(&mut notices, Utc::now())
    }
}

fn drop_expired(notices: &mut Vec<Notice>, now: DateTime<Utc>) -> usize {
    let before = notices.len();
    notices.retain(|notice| notice.is_active_at(now));
    before - notices.len()
}
