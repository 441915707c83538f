use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{NewWorkoutLog, WorkoutLog, WorkoutLogRow};
use crate::db::StoreResult;

#[async_trait]
pub trait WorkoutLogRepo: Send + Sync {
    async fn insert(&self, user_id: Uuid, log: NewWorkoutLog) -> StoreResult<WorkoutLog>;
    /// Newest `date` first, optionally limited to one week number.
    async fn list(&self, user_id: Uuid, week: Option<i32>) -> StoreResult<Vec<WorkoutLog>>;
}

#[derive(Clone)]
pub struct PgWorkoutLogRepo {
    db: PgPool,
}

impl PgWorkoutLogRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkoutLogRepo for PgWorkoutLogRepo {
    async fn insert(&self, user_id: Uuid, log: NewWorkoutLog) -> StoreResult<WorkoutLog> {
        let row = sqlx::query_as::<_, WorkoutLogRow>(
            r#"
            INSERT INTO workout_logs (id, user_id, date, week, day_name, exercises)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, date, week, day_name, exercises
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(log.date)
        .bind(log.week)
        .bind(&log.day_name)
        .bind(Json(&log.exercises))
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn list(&self, user_id: Uuid, week: Option<i32>) -> StoreResult<Vec<WorkoutLog>> {
        let rows = sqlx::query_as::<_, WorkoutLogRow>(
            r#"
            SELECT id, date, week, day_name, exercises
            FROM workout_logs
            WHERE user_id = $1 AND ($2::INT IS NULL OR week = $2)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(week)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(WorkoutLog::from).collect())
    }
}
