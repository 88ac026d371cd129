use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Lifecycle state of a refresh token record.
///
/// `Rotated` and `Revoked` are both terminal and both invalid for rotation,
/// but they are kept distinct for audit: `Rotated` means a successor pair was
/// issued, `Revoked` means explicit termination (logout, logout-all, or a
/// reuse escalation). Records are never deleted; terminal records are what
/// makes reuse detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    Active,
    Rotated,
    Revoked,
}

impl TokenState {
    /// Text form used in the `refresh_tokens.state` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenState::Active => "active",
            TokenState::Rotated => "rotated",
            TokenState::Revoked => "revoked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(TokenState::Active),
            "rotated" => Some(TokenState::Rotated),
            "revoked" => Some(TokenState::Revoked),
            _ => None,
        }
    }
}

/// One row per issued refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    pub token_hash: String,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    pub state: TokenState,
    /// Id of the record this one replaced, if it was minted by a rotation.
    pub rotated_from: Option<Uuid>,
}

impl RefreshRecord {
    /// Expiry is a derived property: an `Active` record past `expires_at` is
    /// invalid without any stored transition.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// Output of pair issuance. `access_ttl_secs` saves callers from recomputing
/// the access expiry out of band (the original wire shape's `expires_in`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_ttl_secs: i64,
}
