pub use jsonwebtoken::Algorithm;

use time::Duration;
use tracing::warn;

/// Which credential verifier the core wires in. There is no fallback between
/// them at runtime: a delegated provider outage is surfaced, not silently
/// retried against the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierKind {
    Local,
    Delegated,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub verifier: VerifierKind,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let jwt_secret = env_string("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET missing; using development default");
            "dev-secret-change-me".into()
        });

        let algorithm = env_string("JWT_ALGORITHM")
            .and_then(|v| parse_algorithm(&v))
            .unwrap_or(Algorithm::HS256);

        let access_ttl = Duration::minutes(
            env_i64("ACCESS_TOKEN_TTL_MINUTES").unwrap_or(15),
        );
        let refresh_ttl = Duration::days(
            env_i64("REFRESH_TOKEN_TTL_DAYS").unwrap_or(7),
        );

        let verifier = match env_string("AUTH_VERIFIER").as_deref() {
            Some("delegated") => VerifierKind::Delegated,
            Some("local") | None => VerifierKind::Local,
            Some(other) => {
                warn!("unknown AUTH_VERIFIER value {other:?}; using local");
                VerifierKind::Local
            }
        };

        AuthConfig {
            jwt_secret,
            algorithm,
            access_ttl,
            refresh_ttl,
            verifier,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_algorithm(value: &str) -> Option<Algorithm> {
    match value.trim().to_ascii_uppercase().as_str() {
        "HS256" => Some(Algorithm::HS256),
        "HS384" => Some(Algorithm::HS384),
        "HS512" => Some(Algorithm::HS512),
        other => {
            warn!("unsupported JWT_ALGORITHM {other:?}; using HS256");
            None
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
