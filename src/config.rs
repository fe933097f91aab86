use anyhow::{bail, Context};
use axum::http::HeaderValue;
use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_seconds: i64,
}

/// Runtime environment; only `Development` exposes internal error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub environment: Environment,
    pub client_origin: HeaderValue,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let ttl_raw = std::env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| "7d".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET is not defined in environment variables")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "finboard".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "finboard-users".into()),
            ttl_seconds: parse_ttl(&ttl_raw)
                .with_context(|| format!("invalid JWT_EXPIRES_IN {ttl_raw:?}"))?,
        };

        let client_url =
            std::env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:5173".into());
        let client_origin = HeaderValue::from_str(&client_url)
            .with_context(|| format!("invalid CLIENT_URL {client_url:?}"))?;

        Ok(Self {
            database_url,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            jwt,
            environment: Environment::parse(
                &std::env::var("APP_ENV").unwrap_or_else(|_| "production".into()),
            ),
            client_origin,
            cookie_secure: std::env::var("COOKIE_SECURE")
                .ok()
                .and_then(|v| env_bool(&v))
                .unwrap_or(false),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn env_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Parses a token lifetime into whole seconds.
///
/// Accepts the short and long unit spellings of the `ms` format (`90s`,
/// `15 mins`, `12h`, `2 days`, `1w`, `1y`, `1.5h`). A bare number is taken
/// as seconds.
pub fn parse_ttl(raw: &str) -> anyhow::Result<i64> {
    lazy_static! {
        static ref TTL_RE: Regex = Regex::new(
            r"(?i)^(\d+(?:\.\d+)?|\.\d+) *(milliseconds?|msecs?|ms|seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|w|years?|yrs?|y)?$"
        )
        .unwrap();
    }

    let raw = raw.trim();
    let Some(caps) = TTL_RE.captures(raw) else {
        bail!("expected a number with an optional unit");
    };
    let value: f64 = caps[1].parse()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    let scale = match unit.as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 0.001,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR,
        "d" | "day" | "days" => DAY,
        "w" | "week" | "weeks" => 7.0 * DAY,
        "y" | "yr" | "yrs" | "year" | "years" => 365.25 * DAY,
        other => bail!("unknown unit {other:?}"),
    };

    let seconds = (value * scale).floor();
    if seconds < 1.0 {
        bail!("lifetime must be at least one second");
    }
    if seconds > i64::MAX as f64 {
        bail!("lifetime overflows");
    }
    Ok(seconds as i64)
}

#[cfg(test)]
impl AppConfig {
    pub fn test() -> Self {
        Self {
            database_url: "memory".into(),
            max_connections: 1,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_seconds: 60 * 5,
            },
            environment: Environment::Production,
            client_origin: HeaderValue::from_static("http://localhost:5173"),
            cookie_secure: false,
        }
    }
}
