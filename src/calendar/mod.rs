//! Islamic calendar.
//!
//! This module provides:
//! - Gregorian to Hijri conversion and its exact inverse
//! - Moon-sighting adjustments of a few days
//! - Notable dates of the Islamic year
//! - Gregorian month views annotated with Hijri dates
//!
//! # Example
//!
//! ```
//! use barakah::calendar::gregorian_to_hijri;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
//! assert_eq!(gregorian_to_hijri(date).to_string(), "2 Ramadan 1445 AH");
//! ```

mod events;
mod hijri;

pub use events::{
    events_on, islamic_events, month_view, upcoming_events, CalendarDay, EventDefinition,
    IslamicEvent, EVENTS,
};
pub use hijri::{
    convert_with_adjustment, gregorian_from_julian_day, gregorian_to_hijri, hijri_to_gregorian,
    is_leap_year, julian_day, month_length, month_name, HijriDate,
};

/// Largest moon-sighting adjustment accepted, in days.
pub const MAX_ADJUSTMENT_DAYS: i64 = 2;
