use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// Which family a plan belongs to; one plan of each kind may be active per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Meal,
    Workout,
}

impl PlanKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanKind::Meal => "meal",
            PlanKind::Workout => "workout",
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meal" => Ok(PlanKind::Meal),
            "workout" => Ok(PlanKind::Workout),
            other => anyhow::bail!("unknown plan kind {other:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub time: String,
    #[serde(default)]
    pub foods: Vec<Food>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub rest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub day: String,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<PlannedExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDetails {
    pub diet_type: String,
    /// Daily calorie target.
    pub calories: f64,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDetails {
    pub split: String,
    pub days: Vec<WorkoutDay>,
}

/// Generation-time snapshot, stored as JSONB and flattened into the plan in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanDetails {
    Meal(MealDetails),
    Workout(WorkoutDetails),
}

impl PlanDetails {
    pub fn kind(&self) -> PlanKind {
        match self {
            PlanDetails::Meal(_) => PlanKind::Meal,
            PlanDetails::Workout(_) => PlanKind::Workout,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: PlanKind,
    pub name: String,
    pub goal: String,
    pub is_active: bool,
    #[serde(flatten)]
    pub details: PlanDetails,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub goal: String,
    pub details: PlanDetails,
}

/// Row shape of the `plans` table.
#[derive(Debug, FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub name: String,
    pub goal: String,
    pub is_active: bool,
    pub details: Json<PlanDetails>,
    pub created_at: OffsetDateTime,
}

impl TryFrom<PlanRow> for Plan {
    type Error = anyhow::Error;

    fn try_from(r: PlanRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            kind: r.kind.parse()?,
            name: r.name,
            goal: r.goal,
            is_active: r.is_active,
            details: r.details.0,
            created_at: r.created_at,
        })
    }
}
