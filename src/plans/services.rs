use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreatePlanRequest, UpdatePlanRequest},
    repo::PlanRepo,
    repo_types::{NewPlan, Plan, PlanDetails, PlanKind},
};
use crate::errors::{AppError, AppResult};

const PLAN_NOT_FOUND: &str = "Plan not found";

fn validate_details(details: &PlanDetails) -> AppResult<()> {
    match details {
        PlanDetails::Meal(m) => {
            if m.diet_type.trim().is_empty() {
                return Err(AppError::validation("dietType is required"));
            }
            if !(m.calories.is_finite() && m.calories > 0.0) {
                return Err(AppError::validation("calories must be a positive number"));
            }
            if m.meals.is_empty() {
                return Err(AppError::validation("meals must not be empty"));
            }
        }
        PlanDetails::Workout(w) => {
            if w.split.trim().is_empty() {
                return Err(AppError::validation("split is required"));
            }
            if w.days.is_empty() {
                return Err(AppError::validation("days must not be empty"));
            }
        }
    }
    Ok(())
}

pub async fn create(
    plans: &dyn PlanRepo,
    user_id: Uuid,
    kind: PlanKind,
    req: CreatePlanRequest,
) -> AppResult<Plan> {
    let name = req.name.trim().to_string();
    let goal = req.goal.trim().to_string();
    if name.is_empty() || goal.is_empty() {
        return Err(AppError::validation("Missing fields"));
    }
    if req.details.kind() != kind {
        warn!(%kind, "plan body does not match route kind");
        return Err(AppError::validation(format!("expected a {kind} plan")));
    }
    validate_details(&req.details)?;

    let plan = plans
        .insert(
            user_id,
            NewPlan {
                name,
                goal,
                details: req.details,
            },
        )
        .await?;
    info!(%user_id, plan_id = %plan.id, %kind, "plan saved");
    Ok(plan)
}

pub async fn list(plans: &dyn PlanRepo, user_id: Uuid, kind: PlanKind) -> AppResult<Vec<Plan>> {
    Ok(plans.list(user_id, kind).await?)
}

/// Activates `id` and deactivates every other plan of the same kind.
pub async fn activate(
    plans: &dyn PlanRepo,
    user_id: Uuid,
    kind: PlanKind,
    id: Uuid,
) -> AppResult<Plan> {
    let plan = plans
        .activate(user_id, kind, id)
        .await?
        .ok_or(AppError::NotFound(PLAN_NOT_FOUND))?;
    info!(%user_id, plan_id = %id, %kind, "plan activated");
    Ok(plan)
}

pub async fn update(
    plans: &dyn PlanRepo,
    user_id: Uuid,
    kind: PlanKind,
    id: Uuid,
    req: UpdatePlanRequest,
) -> AppResult<Plan> {
    if req.name.is_none() && req.is_active.is_none() {
        return Err(AppError::validation("Nothing to update"));
    }

    let mut updated = None;
    if let Some(name) = req.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        updated = Some(
            plans
                .rename(user_id, kind, id, name)
                .await?
                .ok_or(AppError::NotFound(PLAN_NOT_FOUND))?,
        );
    }

    match req.is_active {
        Some(true) => activate(plans, user_id, kind, id).await,
        Some(false) => plans
            .deactivate(user_id, kind, id)
            .await?
            .ok_or(AppError::NotFound(PLAN_NOT_FOUND)),
        None => updated.ok_or(AppError::NotFound(PLAN_NOT_FOUND)),
    }
}

pub async fn delete(plans: &dyn PlanRepo, user_id: Uuid, kind: PlanKind, id: Uuid) -> AppResult<()> {
    if !plans.delete(user_id, kind, id).await? {
        return Err(AppError::NotFound(PLAN_NOT_FOUND));
    }
    info!(%user_id, plan_id = %id, %kind, "plan deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        plans::repo_types::{Meal, MealDetails, WorkoutDay, WorkoutDetails},
        testing::MemoryStore,
    };

    fn meal_req(name: &str) -> CreatePlanRequest {
        CreatePlanRequest {
            name: name.into(),
            goal: "fat loss".into(),
            details: PlanDetails::Meal(MealDetails {
                diet_type: "vegetarian".into(),
                calories: 1900.0,
                meals: vec![Meal {
                    name: "Breakfast".into(),
                    time: "8:00 AM".into(),
                    foods: vec![],
                }],
            }),
        }
    }

    fn workout_req(name: &str) -> CreatePlanRequest {
        CreatePlanRequest {
            name: name.into(),
            goal: "strength".into(),
            details: PlanDetails::Workout(WorkoutDetails {
                split: "PPL".into(),
                days: vec![WorkoutDay {
                    day: "Day 1".into(),
                    name: "Push".into(),
                    exercises: vec![],
                }],
            }),
        }
    }

    fn active_ids(plans: &[Plan]) -> Vec<Uuid> {
        plans.iter().filter(|p| p.is_active).map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn new_plans_start_inactive() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let plan = create(&store, user, PlanKind::Meal, meal_req("P1")).await.unwrap();
        assert!(!plan.is_active);
        assert_eq!(plan.kind, PlanKind::Meal);
    }

    #[tokio::test]
    async fn create_rejects_body_of_other_kind() {
        let store = MemoryStore::default();
        let err = create(&store, Uuid::new_v4(), PlanKind::Workout, meal_req("P1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_requires_name_and_goal() {
        let store = MemoryStore::default();
        let mut req = meal_req("");
        req.goal = String::new();
        let err = create(&store, Uuid::new_v4(), PlanKind::Meal, req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn activation_leaves_exactly_one_active_for_every_prior_state() {
        let user = Uuid::new_v4();
        // prior states: none active, A active, B already active
        for prior in [None, Some(0usize), Some(1usize)] {
            let store = MemoryStore::default();
            let a = create(&store, user, PlanKind::Meal, meal_req("A")).await.unwrap();
            let b = create(&store, user, PlanKind::Meal, meal_req("B")).await.unwrap();
            if let Some(i) = prior {
                let target = [a.id, b.id][i];
                activate(&store, user, PlanKind::Meal, target).await.unwrap();
            }

            let activated = activate(&store, user, PlanKind::Meal, b.id).await.unwrap();
            assert!(activated.is_active);

            let all = list(&store, user, PlanKind::Meal).await.unwrap();
            assert_eq!(active_ids(&all), vec![b.id]);
        }
    }

    #[tokio::test]
    async fn activation_does_not_touch_other_kind_or_other_users() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let other_user = Uuid::new_v4();

        let workout = create(&store, user, PlanKind::Workout, workout_req("W")).await.unwrap();
        activate(&store, user, PlanKind::Workout, workout.id).await.unwrap();
        let theirs = create(&store, other_user, PlanKind::Meal, meal_req("T")).await.unwrap();
        activate(&store, other_user, PlanKind::Meal, theirs.id).await.unwrap();

        let mine = create(&store, user, PlanKind::Meal, meal_req("M")).await.unwrap();
        activate(&store, user, PlanKind::Meal, mine.id).await.unwrap();

        let workouts = list(&store, user, PlanKind::Workout).await.unwrap();
        assert_eq!(active_ids(&workouts), vec![workout.id]);
        let their_meals = list(&store, other_user, PlanKind::Meal).await.unwrap();
        assert_eq!(active_ids(&their_meals), vec![theirs.id]);
    }

    #[tokio::test]
    async fn foreign_plan_is_not_found_and_survives() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let plan = create(&store, owner, PlanKind::Meal, meal_req("Mine")).await.unwrap();

        let err = delete(&store, intruder, PlanKind::Meal, plan.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = activate(&store, intruder, PlanKind::Meal, plan.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let still_there = list(&store, owner, PlanKind::Meal).await.unwrap();
        assert_eq!(still_there.len(), 1);
        assert!(!still_there[0].is_active);
    }

    #[tokio::test]
    async fn plan_is_scoped_by_kind() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let plan = create(&store, user, PlanKind::Meal, meal_req("Mine")).await.unwrap();
        let err = delete(&store, user, PlanKind::Workout, plan.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_renames_and_deactivates() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let plan = create(&store, user, PlanKind::Meal, meal_req("Old")).await.unwrap();
        activate(&store, user, PlanKind::Meal, plan.id).await.unwrap();

        let updated = update(
            &store,
            user,
            PlanKind::Meal,
            plan.id,
            UpdatePlanRequest {
                name: Some("New".into()),
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "New");
        assert!(!updated.is_active);

        let err = update(&store, user, PlanKind::Meal, plan.id, UpdatePlanRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let first = create(&store, user, PlanKind::Meal, meal_req("1")).await.unwrap();
        let second = create(&store, user, PlanKind::Meal, meal_req("2")).await.unwrap();
        let ids: Vec<Uuid> = list(&store, user, PlanKind::Meal)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
