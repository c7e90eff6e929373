//! Notable dates of the Islamic year and calendar views.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::hijri::{gregorian_to_hijri, HijriDate};

/// A notable date of the Islamic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDefinition {
    /// Hijri month.
    pub month: u32,
    /// Hijri day.
    pub day: u32,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
}

/// Events in calendar order.
pub const EVENTS: [EventDefinition; 9] = [
    EventDefinition {
        month: 1,
        day: 1,
        name: "Islamic New Year",
        description: "First day of Muharram, the start of the Hijri year",
    },
    EventDefinition {
        month: 1,
        day: 10,
        name: "Ashura",
        description: "Tenth of Muharram, a recommended day of fasting",
    },
    EventDefinition {
        month: 3,
        day: 12,
        name: "Mawlid an-Nabi",
        description: "Traditional date of the Prophet's birth",
    },
    EventDefinition {
        month: 7,
        day: 27,
        name: "Isra and Mi'raj",
        description: "The Night Journey and Ascension",
    },
    EventDefinition {
        month: 9,
        day: 1,
        name: "Start of Ramadan",
        description: "First day of the month of fasting",
    },
    EventDefinition {
        month: 9,
        day: 27,
        name: "Laylat al-Qadr",
        description: "Commonly observed Night of Decree",
    },
    EventDefinition {
        month: 10,
        day: 1,
        name: "Eid al-Fitr",
        description: "Festival of breaking the fast",
    },
    EventDefinition {
        month: 12,
        day: 9,
        name: "Day of Arafah",
        description: "Day of standing at Arafah during Hajj",
    },
    EventDefinition {
        month: 12,
        day: 10,
        name: "Eid al-Adha",
        description: "Festival of sacrifice",
    },
];

/// An event resolved to a concrete year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IslamicEvent {
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Hijri date.
    pub hijri: HijriDate,
    /// Gregorian date.
    pub gregorian: NaiveDate,
}

/// One day of a Gregorian month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    /// Gregorian date.
    pub gregorian: NaiveDate,
    /// Hijri date after adjustment.
    pub hijri: HijriDate,
    /// Names of events falling on this day.
    pub events: Vec<&'static str>,
}

/// Events of a Hijri year with their Gregorian dates.
#[must_use]
pub fn islamic_events(hijri_year: i32) -> Vec<IslamicEvent> {
    EVENTS
        .iter()
        .filter_map(|def| {
            let hijri = HijriDate::new(hijri_year, def.month, def.day)?;
            Some(IslamicEvent {
                name: def.name,
                description: def.description,
                hijri,
                gregorian: hijri.to_gregorian()?,
            })
        })
        .collect()
}

/// Names of the events falling on a Hijri date.
#[must_use]
pub fn events_on(hijri: HijriDate) -> Vec<&'static str> {
    EVENTS
        .iter()
        .filter(|def| def.month == hijri.month && def.day == hijri.day)
        .map(|def| def.name)
        .collect()
}

/// Next events on or after `from`, at most `limit`.
#[must_use]
pub fn upcoming_events(from: NaiveDate, limit: usize) -> Vec<IslamicEvent> {
    let year = gregorian_to_hijri(from).year;
    islamic_events(year)
        .into_iter()
        .chain(islamic_events(year + 1))
        .filter(|event| event.gregorian >= from)
        .take(limit)
        .collect()
}

/// Every day of a Gregorian month with its Hijri date and events.
///
/// Returns `None` for an invalid year/month.
#[must_use]
pub fn month_view(year: i32, month: u32, adjustment_days: i64) -> Option<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|gregorian| {
            let hijri = gregorian_to_hijri(gregorian).adjusted(adjustment_days);
            CalendarDay {
                gregorian,
                hijri,
                events: events_on(hijri),
            }
        })
        .collect();
    Some(days)
}
