use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use super::{
    dto::{
        ChatRequest, ChatResponse, GeneratedMealPlan, MealPlanRequest, WorkoutPlanRequest,
        WorkoutPlanResponse,
    },
    services,
};
use crate::{
    auth::extractors::AuthUser,
    errors::{AppError, AppResult},
    state::AppState,
};

pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plan", post(meal_plan))
        .route("/workouts", post(workout_plan))
        .route("/chatbot", post(chatbot))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn meal_plan(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<MealPlanRequest>, AppError>,
) -> AppResult<Json<GeneratedMealPlan>> {
    let plan = services::generate_meal_plan(state.ai.as_ref(), payload).await?;
    Ok(Json(plan))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn workout_plan(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<WorkoutPlanRequest>, AppError>,
) -> AppResult<Json<WorkoutPlanResponse>> {
    let plan = services::generate_workout_plan(state.ai.as_ref(), payload).await?;
    Ok(Json(WorkoutPlanResponse { plan }))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.id))]
pub async fn chatbot(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<ChatRequest>, AppError>,
) -> AppResult<Json<ChatResponse>> {
    let reply = services::chat(state.ai.as_ref(), payload.messages).await?;
    Ok(Json(ChatResponse { reply }))
}
