use serde::{Deserialize, Serialize};

use super::repo_types::PlanDetails;

/// Body of `POST /plans/{kind}`: common fields plus the kind's snapshot.
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub goal: String,
    #[serde(flatten)]
    pub details: PlanDetails,
}

/// Body of `PATCH /plans/{kind}/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
