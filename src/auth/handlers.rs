use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use tracing::{info, instrument, warn};

use super::{
    claims::Identity,
    dto::{AuthResponse, LoginRequest, MessageResponse, PublicUser, RegisterRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    repo_types::User,
    services,
    session::{end_session, issue_session},
};
use crate::{
    errors::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn start_session(state: &AppState, jar: CookieJar, user: &User) -> AppResult<CookieJar> {
    let identity = Identity {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
    };
    let keys = JwtKeys::from_ref(state);
    Ok(issue_session(jar, &keys, &identity, state.config.production)?)
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> AppResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let user = services::register(state.users.as_ref(), payload).await?;
    let jar = start_session(&state, jar, &user)?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse { user: user.into() }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let user = services::login(state.users.as_ref(), payload).await?;
    let jar = start_session(&state, jar, &user)?;
    Ok((jar, Json(AuthResponse { user: user.into() })))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    info!("session cleared");
    (
        end_session(jar, state.config.production),
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<PublicUser>> {
    match state.users.find_by_id(identity.id).await? {
        Some(user) => Ok(Json(user.into())),
        None => {
            warn!("session refers to a missing user");
            Err(AppError::Unauthorized)
        }
    }
}
