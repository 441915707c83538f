use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

/// Argon2id cost: 64 MiB, 3 passes, 1 lane.
const M_COST_KIB: u32 = 64 * 1024;
const T_COST: u32 = 3;
const P_COST: u32 = 1;

fn hasher() -> anyhow::Result<Argon2<'static>> {
    let params = Params::new(M_COST_KIB, T_COST, P_COST, None)
        .map_err(|e| anyhow::anyhow!("argon2 params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = hasher()?;
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    // Cost parameters are read from the encoded hash.
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

lazy_static! {
    static ref DUMMY_HASH: Option<String> = hash_password("fitforge-dummy-password").ok();
}

/// Builds the dummy hash so the first unknown-email login does not pay for it.
pub fn warm_up() -> anyhow::Result<()> {
    lazy_static::initialize(&DUMMY_HASH);
    match DUMMY_HASH.as_deref() {
        Some(_) => Ok(()),
        None => anyhow::bail!("failed to build the dummy password hash"),
    }
}

/// Verifies against `hash`, or burns one verification against a dummy hash
/// when the account does not exist, so both login failures cost the same.
pub fn verify_password_or_dummy(plain: &str, hash: Option<&str>) -> anyhow::Result<bool> {
    match hash {
        Some(h) => verify_password(plain, h),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(plain, dummy);
            }
            Ok(false)
        }
    }
}
