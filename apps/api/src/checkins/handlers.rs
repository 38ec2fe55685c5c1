use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::checkins::repository;
use crate::clock::CivilCalendar;
use crate::errors::AppError;
use crate::models::checkin::{CheckinRow, CheckinWithCustomerRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub customer_id: Uuid,
    /// Defaults to today in the civil calendar.
    pub checkin_date: Option<NaiveDate>,
    /// Defaults to the civil time now.
    pub checkin_time: Option<NaiveTime>,
}

#[derive(Deserialize)]
pub struct TodayQuery {
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
    pub search: Option<String>,
}

/// Fills in the civil date and time of `now` for whatever the request left
/// out, and rejects dates after today.
pub fn resolve_checkin_slot(
    calendar: &CivilCalendar,
    now: DateTime<Utc>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<(NaiveDate, Option<NaiveTime>), AppError> {
    let local = calendar.local(now);
    let today = local.date();

    let checkin_date = date.unwrap_or(today);
    if checkin_date > today {
        return Err(AppError::Validation(format!(
            "checkin_date {checkin_date} is in the future (today is {today})"
        )));
    }
    let checkin_time = time.or_else(|| local.time().with_nanosecond(0));
    Ok((checkin_date, checkin_time))
}

/// POST /api/checkins
pub async fn handle_create_checkin(
    State(state): State<AppState>,
    Json(req): Json<CheckinRequest>,
) -> Result<(StatusCode, Json<CheckinRow>), AppError> {
    let (checkin_date, checkin_time) = resolve_checkin_slot(
        &state.engine.settings().calendar(),
        state.clock.now(),
        req.checkin_date,
        req.checkin_time,
    )?;

    let checkin =
        repository::create_checkin(&state.db, req.customer_id, checkin_date, checkin_time).await?;
    Ok((StatusCode::CREATED, Json(checkin)))
}

/// GET /api/checkins/today?search=
pub async fn handle_today_checkins(
    State(state): State<AppState>,
    Query(params): Query<TodayQuery>,
) -> Result<Json<Vec<CheckinWithCustomerRow>>, AppError> {
    let today = state.today();
    let rows = repository::list_for_date(&state.db, today, params.search.as_deref()).await?;
    tracing::debug!("{} check-ins on {today}", rows.len());
    Ok(Json(rows))
}

/// GET /api/checkins?date=YYYY-MM-DD
pub async fn handle_checkins_on_date(
    State(state): State<AppState>,
    Query(params): Query<DateQuery>,
) -> Result<Json<Vec<CheckinWithCustomerRow>>, AppError> {
    let date = params.date.unwrap_or_else(|| state.today());
    let rows = repository::list_for_date(&state.db, date, params.search.as_deref()).await?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;
    use crate::reminders::fixtures::{date, instant};

    fn utc8() -> CivilCalendar {
        CivilCalendar::new(FixedOffset::east_opt(8 * 3600).unwrap())
    }

    #[test]
    fn test_defaults_to_civil_date_and_time() {
        // 16:30 UTC on the 9th is 00:30 on the 10th at UTC+8
        let (day, time) =
            resolve_checkin_slot(&utc8(), instant("2024-06-09T16:30:00Z"), None, None).unwrap();
        assert_eq!(day, date(2024, 6, 10));
        assert_eq!(time, NaiveTime::from_hms_opt(0, 30, 0));
    }

    #[test]
    fn test_default_time_drops_subseconds() {
        let (_, time) =
            resolve_checkin_slot(&utc8(), instant("2024-06-10T04:05:06.789Z"), None, None)
                .unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(12, 5, 6));
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let at = NaiveTime::from_hms_opt(7, 45, 0);
        let (day, time) = resolve_checkin_slot(
            &utc8(),
            instant("2024-06-10T04:00:00Z"),
            Some(date(2024, 6, 3)),
            at,
        )
        .unwrap();
        assert_eq!(day, date(2024, 6, 3));
        assert_eq!(time, at);
    }

    #[test]
    fn test_today_is_accepted_and_tomorrow_rejected() {
        let now = instant("2024-06-10T04:00:00Z");
        assert!(resolve_checkin_slot(&utc8(), now, Some(date(2024, 6, 10)), None).is_ok());

        let err = resolve_checkin_slot(&utc8(), now, Some(date(2024, 6, 11)), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.contains("in the future")));
    }
}
