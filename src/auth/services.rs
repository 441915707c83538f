use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    dto::{LoginRequest, RegisterRequest},
    password::{hash_password, verify_password_or_dummy},
    repo::UserRepo,
    repo_types::{NewUser, User},
};
use crate::{
    db::StoreError,
    errors::{AppError, AppResult},
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates the account; the caller issues the session.
pub async fn register(users: &dyn UserRepo, req: RegisterRequest) -> AppResult<User> {
    let name = req.name.trim().to_string();
    let email = normalize_email(&req.email);

    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("User already exists"));
    }

    let password_hash = hash_password(&req.password)?;
    let user = users
        .create(NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent registration
            StoreError::Conflict => AppError::Conflict("User already exists"),
            other => other.into(),
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Checks credentials. Unknown email and wrong password are indistinguishable.
pub async fn login(users: &dyn UserRepo, req: LoginRequest) -> AppResult<User> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    if req.password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    let user = users.find_by_email(&email).await?;
    let hash = user.as_ref().map(|u| u.password_hash.as_str());
    let ok = verify_password_or_dummy(&req.password, hash)?;

    match user {
        Some(user) if ok => {
            info!(user_id = %user.id, "user logged in");
            Ok(user)
        }
        _ => {
            warn!("login rejected");
            Err(AppError::InvalidCredentials)
        }
    }
}
