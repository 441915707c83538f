use tracing::{info, warn};

use super::{
    client::{ChatMessage, CompletionClient, CompletionRequest, Role},
    dto::{GeneratedMealPlan, GeneratedWorkoutPlan, MealPlanRequest, WorkoutPlanRequest},
    extract::extract_json,
    prompts,
};
use crate::errors::{AppError, AppResult};

pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";
const MAX_CHAT_MESSAGES: usize = 50;

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn in_range(field: &str, value: u32, range: std::ops::RangeInclusive<u32>) -> AppResult<()> {
    if !range.contains(&value) {
        return Err(AppError::validation(format!(
            "{field} must be between {} and {}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

async fn complete(ai: &dyn CompletionClient, req: CompletionRequest) -> AppResult<String> {
    let text = ai
        .complete(req)
        .await
        .map_err(|e| AppError::Upstream(format!("{e:#}")))?;
    if text.trim().is_empty() {
        return Err(AppError::Upstream("empty completion".into()));
    }
    Ok(text)
}

pub async fn generate_meal_plan(
    ai: &dyn CompletionClient,
    req: MealPlanRequest,
) -> AppResult<GeneratedMealPlan> {
    require("goal", &req.goal)?;
    require("dietType", &req.diet_type)?;
    require("budget", &req.budget)?;
    in_range("mealsPerDay", req.meals_per_day, 1..=8)?;

    let text = complete(
        ai,
        CompletionRequest {
            messages: vec![
                ChatMessage::system(prompts::JSON_ONLY_SYSTEM),
                ChatMessage::user(prompts::meal_plan_prompt(&req)),
            ],
            temperature: Some(0.3),
            max_tokens: None,
            json_mode: true,
        },
    )
    .await?;

    let plan: GeneratedMealPlan = extract_json(&text)
        .map_err(|e| AppError::Upstream(format!("malformed meal plan: {e}")))?;
    if plan.meals.is_empty() {
        return Err(AppError::Upstream("meal plan without meals".into()));
    }
    info!(meals = plan.meals.len(), calories = plan.calories, "meal plan generated");
    Ok(plan)
}

pub async fn generate_workout_plan(
    ai: &dyn CompletionClient,
    req: WorkoutPlanRequest,
) -> AppResult<GeneratedWorkoutPlan> {
    require("goal", &req.goal)?;
    require("experience", &req.experience)?;
    require("equipment", &req.equipment)?;
    require("split", &req.split)?;
    in_range("daysPerWeek", req.days_per_week, 1..=7)?;
    in_range("timePerSession", req.time_per_session, 10..=240)?;

    let text = complete(
        ai,
        CompletionRequest {
            messages: vec![ChatMessage::user(prompts::workout_plan_prompt(&req))],
            temperature: Some(0.4),
            max_tokens: Some(2000),
            json_mode: false,
        },
    )
    .await?;

    let plan: GeneratedWorkoutPlan = extract_json(&text)
        .map_err(|e| AppError::Upstream(format!("malformed workout plan: {e}")))?;
    if plan.days.is_empty() {
        return Err(AppError::Upstream("workout plan without days".into()));
    }
    info!(days = plan.days.len(), split = %plan.split, "workout plan generated");
    Ok(plan)
}

/// Forwards the conversation behind the coach system prompt. Clients may only
/// send `user` and `assistant` turns.
pub async fn chat(
    ai: &dyn CompletionClient,
    messages: Option<serde_json::Value>,
) -> AppResult<String> {
    let history: Vec<ChatMessage> = messages
        .and_then(|v| serde_json::from_value(v).ok())
        .ok_or_else(|| AppError::validation("Invalid messages format"))?;
    if history.is_empty() || history.len() > MAX_CHAT_MESSAGES {
        return Err(AppError::validation("Invalid messages format"));
    }
    if history.iter().any(|m| m.role == Role::System) {
        warn!("client attempted to send a system message");
        return Err(AppError::validation("Invalid messages format"));
    }

    let mut conversation = Vec::with_capacity(history.len() + 1);
    conversation.push(ChatMessage::system(prompts::COACH_SYSTEM));
    conversation.extend(history);

    let reply = ai
        .complete(CompletionRequest {
            messages: conversation,
            ..Default::default()
        })
        .await
        .map_err(|e| AppError::Upstream(format!("{e:#}")))?;

    let reply = reply.trim();
    if reply.is_empty() {
        return Ok(CHAT_FALLBACK_REPLY.to_string());
    }
    Ok(reply.to_string())
}
