use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Upstream chat-completion endpoint used for plan generation and the coach bot.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub referer: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Marks the session cookie `Secure`.
    pub production: bool,
    pub jwt: JwtConfig,
    pub ai: AiConfig,
}

/// `default` when `key` is unset; a set but unparsable value is an error.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fitforge".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fitforge-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60 * 24 * 7)?,
        };
        let ai = AiConfig {
            api_url: std::env::var("AI_API_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1/chat/completions".into()),
            api_key: std::env::var("AI_API_KEY").context("AI_API_KEY is not set")?,
            model: std::env::var("AI_MODEL").context("AI_MODEL is not set")?,
            timeout_secs: env_or("AI_TIMEOUT_SECS", 60)?,
            max_retries: env_or("AI_MAX_RETRIES", 2)?,
            referer: std::env::var("AI_REFERER").ok(),
            title: std::env::var("AI_TITLE").ok(),
        };
        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080)?,
            production,
            jwt,
            ai,
        })
    }
}
