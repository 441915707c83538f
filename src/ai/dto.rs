use serde::{Deserialize, Deserializer, Serialize};

use crate::plans::repo_types::{Meal, WorkoutDay};

/// Form fields arrive as either JSON numbers or numeric strings.
fn flexible_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u32),
        Str(String),
    }
    match NumOrStr::deserialize(d)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanRequest {
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub diet_type: String,
    #[serde(deserialize_with = "flexible_u32")]
    pub meals_per_day: u32,
    #[serde(default)]
    pub budget: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlanRequest {
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub equipment: String,
    #[serde(deserialize_with = "flexible_u32")]
    pub days_per_week: u32,
    #[serde(deserialize_with = "flexible_u32")]
    pub time_per_session: u32,
    #[serde(default)]
    pub split: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<serde_json::Value>,
}

/// What the model must return for `POST /meal-plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedMealPlan {
    pub calories: f64,
    pub meals: Vec<Meal>,
}

/// What the model must return for `POST /workouts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedWorkoutPlan {
    pub name: String,
    pub goal: String,
    pub split: String,
    pub days: Vec<WorkoutDay>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutPlanResponse {
    pub plan: GeneratedWorkoutPlan,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}
