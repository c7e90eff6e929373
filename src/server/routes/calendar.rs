//! Hijri calendar routes. All public; `today` honours the caller's
//! moon-sighting adjustment when `x-user-id` is present.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{
    convert_with_adjustment, events_on, hijri_to_gregorian, islamic_events, month_view,
    upcoming_events, CalendarDay, HijriDate, IslamicEvent, MAX_ADJUSTMENT_DAYS,
};
use crate::error::ServiceError;
use crate::server::error::{ApiError, ApiResponse};
use crate::server::extract::AuthUser;
use crate::server::state::AppState;

/// Years accepted by the calendar routes, both calendars.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;
const DEFAULT_UPCOMING: usize = 5;
const MAX_UPCOMING: usize = 50;

/// A Gregorian date with its Hijri equivalent.
#[derive(Debug, Serialize)]
pub struct Conversion {
    /// Gregorian date.
    pub gregorian: NaiveDate,
    /// Hijri date after adjustment.
    pub hijri: HijriDate,
    /// Adjustment applied, in days.
    pub adjustment_days: i64,
    /// Events falling on the day.
    pub events: Vec<&'static str>,
}

/// A Gregorian month annotated with Hijri dates.
#[derive(Debug, Serialize)]
pub struct MonthView {
    /// Gregorian year.
    pub year: i32,
    /// Gregorian month.
    pub month: u32,
    /// Adjustment applied, in days.
    pub adjustment_days: i64,
    /// Every day of the month.
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Deserialize)]
struct ConvertQuery {
    date: NaiveDate,
    adjustment: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct HijriQuery {
    year: i32,
    month: u32,
    day: u32,
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    year: i32,
    month: u32,
    adjustment: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct EventsQuery {
    hijri_year: i32,
}

#[derive(Debug, Deserialize)]
struct UpcomingQuery {
    limit: Option<usize>,
}

fn check_adjustment(adjustment: Option<i64>) -> Result<i64, ServiceError> {
    let days = adjustment.unwrap_or(0);
    if !(-MAX_ADJUSTMENT_DAYS..=MAX_ADJUSTMENT_DAYS).contains(&days) {
        return Err(ServiceError::invalid(
            "adjustment",
            format!("must be between -{MAX_ADJUSTMENT_DAYS} and {MAX_ADJUSTMENT_DAYS}"),
        ));
    }
    Ok(days)
}

fn check_year(field: &str, year: i32) -> Result<(), ServiceError> {
    if YEAR_RANGE.contains(&year) {
        Ok(())
    } else {
        Err(ServiceError::invalid(
            field,
            format!("must be between {} and {}", YEAR_RANGE.start(), YEAR_RANGE.end()),
        ))
    }
}

fn convert(date: NaiveDate, adjustment_days: i64) -> Conversion {
    let hijri = convert_with_adjustment(date, adjustment_days);
    Conversion {
        gregorian: date,
        hijri,
        adjustment_days,
        events: events_on(hijri),
    }
}

async fn today(
    State(state): State<AppState>,
    user: Option<AuthUser>,
) -> Result<Json<ApiResponse<Conversion>>, ApiError> {
    let adjustment = match user {
        Some(user) => i64::from(
            state
                .personalization()
                .get(user.id())
                .await?
                .hijri_adjustment_days,
        ),
        None => 0,
    };
    Ok(Json(ApiResponse::success(convert(state.today(), adjustment))))
}

async fn convert_date(
    query: Result<Query<ConvertQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Conversion>>, ApiError> {
    let Query(query) = query?;
    check_year("date", query.date.year())?;
    let adjustment = check_adjustment(query.adjustment)?;
    Ok(Json(ApiResponse::success(convert(query.date, adjustment))))
}

async fn to_gregorian(
    query: Result<Query<HijriQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Conversion>>, ApiError> {
    let Query(query) = query?;
    check_year("year", query.year)?;
    let gregorian = hijri_to_gregorian(query.year, query.month, query.day).ok_or_else(|| {
        ServiceError::invalid(
            "date",
            format!(
                "{}-{}-{} is not a valid Hijri date",
                query.year, query.month, query.day
            ),
        )
    })?;
    Ok(Json(ApiResponse::success(convert(gregorian, 0))))
}

async fn month(
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<MonthView>>, ApiError> {
    let Query(query) = query?;
    check_year("year", query.year)?;
    let adjustment = check_adjustment(query.adjustment)?;
    let days = month_view(query.year, query.month, adjustment)
        .ok_or_else(|| ServiceError::invalid("month", "must be between 1 and 12"))?;
    Ok(Json(ApiResponse::success(MonthView {
        year: query.year,
        month: query.month,
        adjustment_days: adjustment,
        days,
    })))
}

async fn events(
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<IslamicEvent>>>, ApiError> {
    let Query(query) = query?;
    check_year("hijri_year", query.hijri_year)?;
    Ok(Json(ApiResponse::success(islamic_events(query.hijri_year))))
}

async fn upcoming(
    State(state): State<AppState>,
    query: Result<Query<UpcomingQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<IslamicEvent>>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_UPCOMING);
    if !(1..=MAX_UPCOMING).contains(&limit) {
        return Err(
            ServiceError::invalid("limit", format!("must be between 1 and {MAX_UPCOMING}")).into(),
        );
    }
    Ok(Json(ApiResponse::success(upcoming_events(state.today(), limit))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/calendar/today", get(today))
        .route("/api/calendar/convert", get(convert_date))
        .route("/api/calendar/to-gregorian", get(to_gregorian))
        .route("/api/calendar/month", get(month))
        .route("/api/calendar/events", get(events))
        .route("/api/calendar/upcoming", get(upcoming))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_check_adjustment() {
        assert_eq!(check_adjustment(None).unwrap(), 0);
        assert_eq!(check_adjustment(Some(-2)).unwrap(), -2);
        assert!(check_adjustment(Some(3)).is_err());
    }

    #[test]
    fn test_convert_marks_events() {
        let eid = NaiveDate::from_ymd_opt(2024, 4, 9).unwrap();
        let conversion = convert(eid, 0);
        assert_eq!(conversion.hijri.month, 10);
        assert_eq!(conversion.hijri.day, 1);
        assert_eq!(conversion.events, vec!["Eid al-Fitr"]);
    }
}
