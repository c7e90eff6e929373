//! Daily reminders.
//!
//! [`ReminderService`] asks the model for one short reminder per session and
//! keeps it in a [`ReminderCache`] for 24 hours. When the model is slow or
//! unavailable a canned reminder is served instead and nothing is cached.

mod cache;
mod service;

pub use cache::{ReminderCache, REMINDER_TTL_HOURS};
pub use service::{DailyReminder, ReminderService, ReminderSource};
