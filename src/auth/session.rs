use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use super::{claims::Identity, jwt::JwtKeys};

pub const SESSION_COOKIE: &str = "auth_token";

fn session_cookie(value: String, max_age: time::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Signs a token for `identity` and stores it in the session cookie.
pub fn issue_session(
    jar: CookieJar,
    keys: &JwtKeys,
    identity: &Identity,
    secure: bool,
) -> anyhow::Result<CookieJar> {
    let token = keys.sign(identity)?;
    let max_age = time::Duration::seconds(keys.ttl.as_secs() as i64);
    Ok(jar.add(session_cookie(token, max_age, secure)))
}

/// Resolves the caller from the session cookie. Anything missing, malformed,
/// expired or forged is treated as anonymous.
pub fn validate_session(jar: &CookieJar, keys: &JwtKeys) -> Option<Identity> {
    let token = jar.get(SESSION_COOKIE)?.value();
    if token.is_empty() {
        return None;
    }
    match keys.verify(token) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            debug!(error = %e, "session cookie rejected");
            None
        }
    }
}

/// Overwrites the session cookie with an empty, immediately expiring one.
pub fn end_session(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(session_cookie(String::new(), time::Duration::ZERO, secure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use jsonwebtoken::{encode, Header};
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn keys() -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: "session-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: 60 * 24 * 7,
        })
    }

    fn identity(email: &str) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: email.into(),
            name: "Ann".into(),
        }
    }

    #[test]
    fn issued_cookie_has_session_attributes() {
        let jar = issue_session(CookieJar::new(), &keys(), &identity("a@x.com"), true)
            .expect("issue");
        let cookie = jar.get(SESSION_COOKIE).expect("cookie set");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }

    #[test]
    fn issued_session_validates_to_same_identity() {
        let keys = keys();
        let who = identity("a@x.com");
        let jar = issue_session(CookieJar::new(), &keys, &who, false).expect("issue");
        assert_eq!(validate_session(&jar, &keys), Some(who));
    }

    #[test]
    fn missing_or_garbage_cookie_is_anonymous() {
        let keys = keys();
        assert_eq!(validate_session(&CookieJar::new(), &keys), None);
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "not.a.jwt"));
        assert_eq!(validate_session(&jar, &keys), None);
    }

    #[test]
    fn expired_token_is_anonymous() {
        let keys = keys();
        let who = identity("old@x.com");
        let past = OffsetDateTime::now_utc() - time::Duration::days(8);
        let claims = crate::auth::claims::Claims {
            id: who.id,
            email: who.email,
            name: who.name,
            iat: past.unix_timestamp() as usize,
            exp: (past + time::Duration::days(1)).unix_timestamp() as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, token));
        assert_eq!(validate_session(&jar, &keys), None);
    }

    #[test]
    fn tampered_payload_is_anonymous() {
        let keys = keys();
        let victim = keys.sign(&identity("victim@x.com")).expect("sign");
        let attacker = keys.sign(&identity("attacker@x.com")).expect("sign");

        // attacker's payload under the victim's signature
        let v: Vec<&str> = victim.split('.').collect();
        let a: Vec<&str> = attacker.split('.').collect();
        let forged = format!("{}.{}.{}", v[0], a[1], v[2]);

        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, forged));
        assert_eq!(validate_session(&jar, &keys), None);
    }

    #[test]
    fn end_session_clears_cookie() {
        let keys = keys();
        let jar = issue_session(CookieJar::new(), &keys, &identity("a@x.com"), false)
            .expect("issue");
        let jar = end_session(jar, false);
        let cookie = jar.get(SESSION_COOKIE).expect("cookie present");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(validate_session(&jar, &keys), None);
    }
}
