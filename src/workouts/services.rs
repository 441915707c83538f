use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
};
use tracing::info;
use uuid::Uuid;

use super::{
    dto::CreateWorkoutLogRequest,
    repo::WorkoutLogRepo,
    repo_types::{NewWorkoutLog, WorkoutLog},
};
use crate::errors::{AppError, AppResult};

fn parse_date(raw: &str) -> AppResult<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::validation("date is required"));
    }
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| AppError::validation("date must be RFC 3339 or YYYY-MM-DD"))
}

fn validate_week(week: i32) -> AppResult<i32> {
    if (1..=53).contains(&week) {
        Ok(week)
    } else {
        Err(AppError::validation("week must be between 1 and 53"))
    }
}

pub async fn create(
    logs: &dyn WorkoutLogRepo,
    user_id: Uuid,
    req: CreateWorkoutLogRequest,
) -> AppResult<WorkoutLog> {
    let date = parse_date(&req.date)?;
    let week = validate_week(req.week.unwrap_or_else(|| date.iso_week() as i32))?;

    let day_name = req.day_name.trim().to_string();
    if day_name.is_empty() {
        return Err(AppError::validation("dayName is required"));
    }
    if req.exercises.is_empty() {
        return Err(AppError::validation("exercises must not be empty"));
    }
    for exercise in &req.exercises {
        if exercise.name.trim().is_empty() {
            return Err(AppError::validation("exercise name is required"));
        }
        if exercise.sets.is_empty() {
            return Err(AppError::validation(format!(
                "exercise {:?} has no sets",
                exercise.name
            )));
        }
        if exercise
            .sets
            .iter()
            .any(|s| !s.weight.is_finite() || s.weight < 0.0)
        {
            return Err(AppError::validation("weight must be a non-negative number"));
        }
    }

    let log = logs
        .insert(
            user_id,
            NewWorkoutLog {
                date,
                week,
                day_name,
                exercises: req.exercises,
            },
        )
        .await?;
    info!(%user_id, log_id = %log.id, week, "workout logged");
    Ok(log)
}

pub async fn list(
    logs: &dyn WorkoutLogRepo,
    user_id: Uuid,
    week: Option<i32>,
) -> AppResult<Vec<WorkoutLog>> {
    let week = week.map(validate_week).transpose()?;
    Ok(logs.list(user_id, week).await?)
}
