use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{NewPlan, Plan, PlanKind, PlanRow};
use crate::db::{StoreError, StoreResult};

/// Owner-scoped plan storage. Lookups for plans owned by someone else behave
/// exactly like lookups for plans that do not exist.
#[async_trait]
pub trait PlanRepo: Send + Sync {
    /// Inserts an inactive plan.
    async fn insert(&self, user_id: Uuid, plan: NewPlan) -> StoreResult<Plan>;
    /// Newest first.
    async fn list(&self, user_id: Uuid, kind: PlanKind) -> StoreResult<Vec<Plan>>;
    async fn rename(
        &self,
        user_id: Uuid,
        kind: PlanKind,
        id: Uuid,
        name: &str,
    ) -> StoreResult<Option<Plan>>;
    /// Makes `id` the only active plan of `kind` for `user_id`, atomically.
    async fn activate(&self, user_id: Uuid, kind: PlanKind, id: Uuid) -> StoreResult<Option<Plan>>;
    async fn deactivate(&self, user_id: Uuid, kind: PlanKind, id: Uuid)
        -> StoreResult<Option<Plan>>;
    async fn delete(&self, user_id: Uuid, kind: PlanKind, id: Uuid) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgPlanRepo {
    db: PgPool,
}

impl PgPlanRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_plan(row: PlanRow) -> StoreResult<Plan> {
    Plan::try_from(row).map_err(StoreError::Backend)
}

fn into_plan_opt(row: Option<PlanRow>) -> StoreResult<Option<Plan>> {
    row.map(into_plan).transpose()
}

const PLAN_COLUMNS: &str = "id, user_id, kind, name, goal, is_active, details, created_at";

#[async_trait]
impl PlanRepo for PgPlanRepo {
    async fn insert(&self, user_id: Uuid, plan: NewPlan) -> StoreResult<Plan> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            INSERT INTO plans (id, user_id, kind, name, goal, is_active, details)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(plan.details.kind().as_str())
        .bind(&plan.name)
        .bind(&plan.goal)
        .bind(Json(&plan.details))
        .fetch_one(&self.db)
        .await?;
        into_plan(row)
    }

    async fn list(&self, user_id: Uuid, kind: PlanKind) -> StoreResult<Vec<Plan>> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            SELECT {PLAN_COLUMNS}
            FROM plans
            WHERE user_id = $1 AND kind = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(into_plan).collect()
    }

    async fn rename(
        &self,
        user_id: Uuid,
        kind: PlanKind,
        id: Uuid,
        name: &str,
    ) -> StoreResult<Option<Plan>> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            UPDATE plans SET name = $4
            WHERE id = $1 AND user_id = $2 AND kind = $3
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(kind.as_str())
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        into_plan_opt(row)
    }

    async fn activate(&self, user_id: Uuid, kind: PlanKind, id: Uuid) -> StoreResult<Option<Plan>> {
        let mut tx = self.db.begin().await?;

        // Serialises concurrent activations by the same user; the later one wins.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let owned: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM plans WHERE id = $1 AND user_id = $2 AND kind = $3")
                .bind(id)
                .bind(user_id)
                .bind(kind.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE plans SET is_active = FALSE
            WHERE user_id = $1 AND kind = $2 AND id <> $3 AND is_active
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "UPDATE plans SET is_active = TRUE WHERE id = $1 RETURNING {PLAN_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        into_plan(row).map(Some)
    }

    async fn deactivate(
        &self,
        user_id: Uuid,
        kind: PlanKind,
        id: Uuid,
    ) -> StoreResult<Option<Plan>> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            UPDATE plans SET is_active = FALSE
            WHERE id = $1 AND user_id = $2 AND kind = $3
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_optional(&self.db)
        .await?;
        into_plan_opt(row)
    }

    async fn delete(&self, user_id: Uuid, kind: PlanKind, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1 AND user_id = $2 AND kind = $3")
            .bind(id)
            .bind(user_id)
            .bind(kind.as_str())
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
