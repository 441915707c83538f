use serde::Deserialize;

use super::repo_types::LoggedExercise;

/// Body of `POST /workouts/log`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutLogRequest {
    /// RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
    #[serde(default)]
    pub date: String,
    /// ISO week number; derived from `date` when omitted.
    pub week: Option<i32>,
    #[serde(default)]
    pub day_name: String,
    #[serde(default)]
    pub exercises: Vec<LoggedExercise>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    pub week: Option<i32>,
}
