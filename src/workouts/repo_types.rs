use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub reps: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedExercise {
    pub name: String,
    /// In the order they were performed.
    pub sets: Vec<SetEntry>,
}

/// A completed session. Logs are append-only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub week: i32,
    pub day_name: String,
    pub exercises: Vec<LoggedExercise>,
}

#[derive(Debug, Clone)]
pub struct NewWorkoutLog {
    pub date: OffsetDateTime,
    pub week: i32,
    pub day_name: String,
    pub exercises: Vec<LoggedExercise>,
}

/// Row shape of the `workout_logs` table.
#[derive(Debug, FromRow)]
pub struct WorkoutLogRow {
    pub id: Uuid,
    pub date: OffsetDateTime,
    pub week: i32,
    pub day_name: String,
    pub exercises: Json<Vec<LoggedExercise>>,
}

impl From<WorkoutLogRow> for WorkoutLog {
    fn from(r: WorkoutLogRow) -> Self {
        Self {
            id: r.id,
            date: r.date,
            week: r.week,
            day_name: r.day_name,
            exercises: r.exercises.0,
        }
    }
}
