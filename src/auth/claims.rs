use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The trusted caller resolved from a valid session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// JWT payload stored in the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,       // user ID
    pub email: String,
    pub name: String,
    pub iat: usize,     // issued at (unix timestamp)
    pub exp: usize,     // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}

impl From<Claims> for Identity {
    fn from(c: Claims) -> Self {
        Self {
            id: c.id,
            email: c.email,
            name: c.name,
        }
    }
}
