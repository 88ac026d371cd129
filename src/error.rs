use thiserror::Error;

/// Failure taxonomy for the token core. Every operation returns one of these
/// as a typed outcome; the core never retries and never panics on bad input.
///
/// `ReuseDetected` is security-relevant: it means a rotation was attempted on
/// a refresh token that is no longer `Active`, which is what a replayed or
/// stolen token looks like. Callers are expected to escalate it (typically by
/// revoking the whole account's tokens); the core only reports it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("wrong token type for this operation")]
    WrongTokenType,

    #[error("not found")]
    NotFound,

    #[error("refresh token reuse detected")]
    ReuseDetected,

    #[error("account is inactive")]
    AccountInactive,

    #[error("invalid credentials")]
    AuthFailure,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}
