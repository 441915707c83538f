//! In-memory repositories and request helpers shared by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    ai::client::{CompletionClient, CompletionRequest},
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, User},
        session::SESSION_COOKIE,
    },
    db::{StoreError, StoreResult},
    plans::{
        repo::PlanRepo,
        repo_types::{NewPlan, Plan, PlanKind},
    },
    workouts::{
        repo::WorkoutLogRepo,
        repo_types::{NewWorkoutLog, WorkoutLog},
    },
};

/// Mirrors the Postgres repositories, including the unique email constraint
/// and owner scoping.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    plans: Mutex<Vec<Plan>>,
    logs: Mutex<Vec<(Uuid, WorkoutLog)>>,
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

fn owned(p: &Plan, user_id: Uuid, kind: PlanKind, id: Uuid) -> bool {
    p.id == id && p.user_id == user_id && p.kind == kind
}

#[async_trait]
impl PlanRepo for MemoryStore {
    async fn insert(&self, user_id: Uuid, plan: NewPlan) -> StoreResult<Plan> {
        let plan = Plan {
            id: Uuid::new_v4(),
            user_id,
            kind: plan.details.kind(),
            name: plan.name,
            goal: plan.goal,
            is_active: false,
            details: plan.details,
            created_at: OffsetDateTime::now_utc(),
        };
        self.plans.lock().unwrap().push(plan.clone());
        Ok(plan)
    }

    async fn list(&self, user_id: Uuid, kind: PlanKind) -> StoreResult<Vec<Plan>> {
        let plans = self.plans.lock().unwrap();
        Ok(plans
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id && p.kind == kind)
            .cloned()
            .collect())
    }

    async fn rename(
        &self,
        user_id: Uuid,
        kind: PlanKind,
        id: Uuid,
        name: &str,
    ) -> StoreResult<Option<Plan>> {
        let mut plans = self.plans.lock().unwrap();
        Ok(plans.iter_mut().find(|p| owned(p, user_id, kind, id)).map(|p| {
            p.name = name.to_string();
            p.clone()
        }))
    }

    async fn activate(&self, user_id: Uuid, kind: PlanKind, id: Uuid) -> StoreResult<Option<Plan>> {
        let mut plans = self.plans.lock().unwrap();
        if !plans.iter().any(|p| owned(p, user_id, kind, id)) {
            return Ok(None);
        }
        let mut activated = None;
        for p in plans.iter_mut().filter(|p| p.user_id == user_id && p.kind == kind) {
            p.is_active = p.id == id;
            if p.is_active {
                activated = Some(p.clone());
            }
        }
        Ok(activated)
    }

    async fn deactivate(
        &self,
        user_id: Uuid,
        kind: PlanKind,
        id: Uuid,
    ) -> StoreResult<Option<Plan>> {
        let mut plans = self.plans.lock().unwrap();
        Ok(plans.iter_mut().find(|p| owned(p, user_id, kind, id)).map(|p| {
            p.is_active = false;
            p.clone()
        }))
    }

    async fn delete(&self, user_id: Uuid, kind: PlanKind, id: Uuid) -> StoreResult<bool> {
        let mut plans = self.plans.lock().unwrap();
        let before = plans.len();
        plans.retain(|p| !owned(p, user_id, kind, id));
        Ok(plans.len() < before)
    }
}

#[async_trait]
impl WorkoutLogRepo for MemoryStore {
    async fn insert(&self, user_id: Uuid, log: NewWorkoutLog) -> StoreResult<WorkoutLog> {
        let log = WorkoutLog {
            id: Uuid::new_v4(),
            date: log.date,
            week: log.week,
            day_name: log.day_name,
            exercises: log.exercises,
        };
        self.logs.lock().unwrap().push((user_id, log.clone()));
        Ok(log)
    }

    async fn list(&self, user_id: Uuid, week: Option<i32>) -> StoreResult<Vec<WorkoutLog>> {
        let logs = self.logs.lock().unwrap();
        let mut out: Vec<WorkoutLog> = logs
            .iter()
            .rev()
            .filter(|(owner, l)| *owner == user_id && week.map_or(true, |w| l.week == w))
            .map(|(_, l)| l.clone())
            .collect();
        // Stable sort keeps newer inserts first among equal dates.
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }
}

/// Canned completion backend that records the last request it saw.
pub struct FakeCompletion {
    reply: Option<String>,
    last: Mutex<Option<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            last: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            last: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        *self.last.lock().unwrap() = Some(req);
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("upstream returned 503"))
    }
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn body_json(res: Response<Body>) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

/// The `auth_token=...` pair from a response's `Set-Cookie`, ready for a `Cookie` header.
pub fn session_cookie_from(res: &Response<Body>) -> String {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{SESSION_COOKIE}=")))
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string()
}

pub async fn register_and_login(app: &Router, email: &str, password: &str) -> String {
    let res = send(
        app,
        request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"name": "Test User", "email": email, "password": password})),
        ),
    )
    .await;
    assert!(res.status().is_success(), "register failed: {}", res.status());

    let res = send(
        app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        ),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    session_cookie_from(&res)
}
