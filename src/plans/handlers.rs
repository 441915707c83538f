use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreatePlanRequest, MessageResponse, UpdatePlanRequest},
    repo_types::{Plan, PlanKind},
    services,
};
use crate::{
    auth::extractors::AuthUser,
    errors::{AppError, AppResult},
    state::AppState,
};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plans/:kind", get(list_plans).post(create_plan))
        .route("/plans/:kind/:id", patch(update_plan).delete(delete_plan))
}

#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Path(kind), _): WithRejection<Path<PlanKind>, AppError>,
) -> AppResult<Json<Vec<Plan>>> {
    let plans = services::list(state.plans.as_ref(), identity.id, kind).await?;
    Ok(Json(plans))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn create_plan(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Path(kind), _): WithRejection<Path<PlanKind>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<CreatePlanRequest>, AppError>,
) -> AppResult<(StatusCode, Json<Plan>)> {
    let plan = services::create(state.plans.as_ref(), identity.id, kind, payload).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn update_plan(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Path((kind, id)), _): WithRejection<Path<(PlanKind, Uuid)>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdatePlanRequest>, AppError>,
) -> AppResult<Json<Plan>> {
    let plan = services::update(state.plans.as_ref(), identity.id, kind, id, payload).await?;
    Ok(Json(plan))
}

#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Path((kind, id)), _): WithRejection<Path<(PlanKind, Uuid)>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    services::delete(state.plans.as_ref(), identity.id, kind, id).await?;
    Ok(Json(MessageResponse {
        message: "Plan deleted successfully",
    }))
}
