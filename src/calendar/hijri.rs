//! Gregorian/Hijri conversion.
//!
//! Uses the tabular ("Kuwaiti") Islamic calendar over Julian day numbers:
//! a 30-year cycle of 10631 days, mean year 10631/30 days, epoch JD 1948084.
//! Dates before 15 October 1582 are read as Julian calendar dates.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

const EPOCH_JD: i64 = 1_948_084;
const CYCLE_DAYS: i64 = 10_631;
const MEAN_YEAR: f64 = 10_631.0 / 30.0;
const SHIFT: f64 = 8.01 / 60.0;
const GREGORIAN_REFORM_JD: i64 = 2_299_161;

const MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qadah",
    "Dhu al-Hijjah",
];

const MONTH_NAMES_ARABIC: [&str; 12] = [
    "محرم",
    "صفر",
    "ربيع الأول",
    "ربيع الآخر",
    "جمادى الأولى",
    "جمادى الآخرة",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذو القعدة",
    "ذو الحجة",
];

/// A date in the tabular Islamic calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HijriDate {
    /// Year after the Hijra.
    pub year: i32,
    /// Month, 1 (Muharram) to 12 (Dhu al-Hijjah).
    pub month: u32,
    /// Day of month, 1 to 30.
    pub day: u32,
}

impl HijriDate {
    /// Build a validated Hijri date.
    ///
    /// Returns `None` when the month is outside 1..=12 or the day does not
    /// exist in that month.
    #[must_use]
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > month_length(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Convert a Gregorian date.
    #[must_use]
    pub fn from_gregorian(date: NaiveDate) -> Self {
        Self::from_julian_day(julian_day(date))
    }

    /// Convert to the Gregorian calendar.
    #[must_use]
    pub fn to_gregorian(self) -> Option<NaiveDate> {
        gregorian_from_julian_day(self.julian_day())
    }

    /// Convert a Julian day number.
    #[must_use]
    pub fn from_julian_day(jd: i64) -> Self {
        let z = jd - EPOCH_JD;
        let cycle = z.div_euclid(CYCLE_DAYS);
        let mut z = z - CYCLE_DAYS * cycle;

        let j = ((z as f64 - SHIFT) / MEAN_YEAR).floor() as i64;
        let year = 30 * cycle + j;
        z -= (j as f64 * MEAN_YEAR + SHIFT).floor() as i64;

        let month = (((z as f64 + 28.5001) / 29.5).floor() as i64).min(12);
        let day = z - (29.5001 * month as f64 - 29.0).floor() as i64;

        Self {
            year: year as i32,
            month: month as u32,
            day: day as u32,
        }
    }

    /// Julian day number of this date.
    #[must_use]
    pub fn julian_day(self) -> i64 {
        start_of_month(self.year, self.month) + i64::from(self.day) - 1
    }

    /// Shift by a number of days (moon-sighting adjustment).
    #[must_use]
    pub fn adjusted(self, days: i64) -> Self {
        if days == 0 {
            return self;
        }
        Self::from_julian_day(self.julian_day() + days)
    }

    /// Transliterated month name.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Arabic month name.
    #[must_use]
    pub fn month_name_arabic(&self) -> &'static str {
        self.month
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES_ARABIC.get(i as usize))
            .copied()
            .unwrap_or_default()
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} AH", self.day, self.month_name(), self.year)
    }
}

impl Serialize for HijriDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HijriDate", 6)?;
        state.serialize_field("year", &self.year)?;
        state.serialize_field("month", &self.month)?;
        state.serialize_field("day", &self.day)?;
        state.serialize_field("month_name", self.month_name())?;
        state.serialize_field("month_name_arabic", self.month_name_arabic())?;
        state.serialize_field("formatted", &self.to_string())?;
        state.end()
    }
}

/// Transliterated name of a Hijri month (1-12), empty for anything else.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or_default()
}

/// Convert a Gregorian date to the Hijri calendar.
#[must_use]
pub fn gregorian_to_hijri(date: NaiveDate) -> HijriDate {
    HijriDate::from_gregorian(date)
}

/// Convert a Gregorian date and apply a day adjustment.
#[must_use]
pub fn convert_with_adjustment(date: NaiveDate, adjustment_days: i64) -> HijriDate {
    HijriDate::from_gregorian(date).adjusted(adjustment_days)
}

/// Convert a Hijri date to the Gregorian calendar.
///
/// Returns `None` when the Hijri date does not exist.
#[must_use]
pub fn hijri_to_gregorian(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    HijriDate::new(year, month, day)?.to_gregorian()
}

/// Number of days (29 or 30) in a Hijri month.
///
/// Returns 0 for a month outside 1..=12.
#[must_use]
pub fn month_length(year: i32, month: u32) -> u32 {
    if !(1..=12).contains(&month) {
        return 0;
    }
    let next = if month == 12 {
        start_of_month(year + 1, 1)
    } else {
        start_of_month(year, month + 1)
    };
    (next - start_of_month(year, month)) as u32
}

/// Whether a Hijri year has 355 days.
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    month_length(year, 12) == 30
}

/// Julian day number of the first day of a Hijri month.
fn start_of_month(year: i32, month: u32) -> i64 {
    let year = i64::from(year);
    let cycle = year.div_euclid(30);
    let j = year.rem_euclid(30);
    EPOCH_JD
        + CYCLE_DAYS * cycle
        + (j as f64 * MEAN_YEAR + SHIFT).floor() as i64
        + (29.5001 * f64::from(month) - 29.0).floor() as i64
        + 1
}

/// Julian day number of a calendar date, honouring the October 1582 reform.
#[must_use]
pub fn julian_day(date: NaiveDate) -> i64 {
    let mut y = i64::from(date.year());
    let mut m = i64::from(date.month());
    let d = i64::from(date.day());

    if m < 3 {
        y -= 1;
        m += 12;
    }

    let a = y.div_euclid(100);
    let mut b = 2 - a + a.div_euclid(4);
    if y < 1583 {
        b = 0;
    }
    if y == 1582 {
        if m > 10 {
            b = -10;
        }
        if m == 10 {
            b = if d > 4 { -10 } else { 0 };
        }
    }

    (365.25 * (y + 4716) as f64).floor() as i64 + (30.6001 * (m + 1) as f64).floor() as i64 + d + b
        - 1524
}

/// Calendar date of a Julian day number (Meeus).
#[must_use]
pub fn gregorian_from_julian_day(jd: i64) -> Option<NaiveDate> {
    let a = if jd < GREGORIAN_REFORM_JD {
        jd
    } else {
        let alpha = ((jd as f64 - 1_867_216.25) / 36_524.25).floor() as i64;
        jd + 1 + alpha - alpha.div_euclid(4)
    };
    let b = a + 1524;
    let c = ((b as f64 - 122.1) / 365.25).floor() as i64;
    let d = (365.25 * c as f64).floor() as i64;
    let e = ((b - d) as f64 / 30.6001).floor() as i64;

    let day = b - d - (30.6001 * e as f64).floor() as i64;
    let month = if e < 14 { e - 1 } else { e - 13 };
    let year = if month > 2 { c - 4716 } else { c - 4715 };

    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}
