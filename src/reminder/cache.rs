//! Process-local reminder cache.
//!
//! Entries expire a fixed 24 hours after they were stored. Expiry is checked
//! lazily when an entry is read; there is no background sweep and no size
//! bound.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::traits::{RealTimeProvider, TimeProvider};

/// Lifetime of a cached reminder, in hours.
pub const REMINDER_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
struct CachedReminder {
    text: String,
    stored_at: DateTime<Utc>,
}

/// Session id to reminder text, with a fixed expiry.
pub struct ReminderCache {
    entries: Mutex<HashMap<String, CachedReminder>>,
    clock: Arc<dyn TimeProvider>,
    ttl: Duration,
}

impl ReminderCache {
    /// Create an empty cache reading the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(RealTimeProvider))
    }

    /// Create an empty cache reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            ttl: Duration::hours(REMINDER_TTL_HOURS),
        }
    }

    /// Current time according to the cache clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Cached text for `session`, if stored less than 24 hours ago.
    ///
    /// An expired entry is removed by this call.
    #[must_use]
    pub fn get(&self, session: &str) -> Option<String> {
        let now = self.clock.now();
        let Ok(mut entries) = self.entries.lock() else {
            tracing::warn!(session = %session, "Reminder cache lock poisoned, treating as miss");
            return None;
        };

        let entry = entries.get(session)?;
        if now - entry.stored_at < self.ttl {
            return Some(entry.text.clone());
        }

        tracing::debug!(session = %session, "Reminder expired");
        entries.remove(session);
        None
    }

    /// Store `text` for `session`, replacing any previous entry.
    pub fn put(&self, session: &str, text: impl Into<String>) {
        let entry = CachedReminder {
            text: text.into(),
            stored_at: self.clock.now(),
        };
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(session.to_string(), entry);
            }
            Err(_) => {
                tracing::warn!(session = %session, "Reminder cache lock poisoned, not caching");
            }
        }
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReminderCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReminderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderCache")
            .field("entries", &self.len())
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}
