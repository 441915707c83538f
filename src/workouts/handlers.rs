use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use super::{
    dto::{CreateWorkoutLogRequest, LogQuery},
    repo_types::WorkoutLog,
    services,
};
use crate::{
    auth::extractors::AuthUser,
    errors::{AppError, AppResult},
    state::AppState,
};

pub fn log_routes() -> Router<AppState> {
    Router::new().route("/workouts/log", get(list_logs).post(create_log))
}

#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn list_logs(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Query(q), _): WithRejection<Query<LogQuery>, AppError>,
) -> AppResult<Json<Vec<WorkoutLog>>> {
    let logs = services::list(state.logs.as_ref(), identity.id, q.week).await?;
    Ok(Json(logs))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn create_log(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateWorkoutLogRequest>, AppError>,
) -> AppResult<(StatusCode, Json<WorkoutLog>)> {
    let log = services::create(state.logs.as_ref(), identity.id, payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}
