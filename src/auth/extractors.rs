use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::{claims::Identity, jwt::JwtKeys, session::validate_session};
use crate::errors::AppError;

/// Resolves the caller from the `auth_token` cookie or rejects with 401.
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        match validate_session(&jar, &keys) {
            Some(identity) => Ok(AuthUser(identity)),
            None => {
                warn!(path = %parts.uri.path(), "request without a valid session");
                Err(AppError::Unauthorized)
            }
        }
    }
}
