use std::sync::Arc;

use sha2::{Digest, Sha256};
use time::Duration;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::domain::{IssuedPair, RefreshRecord, TokenState};
use crate::error::AuthError;
use crate::security::jwt::{Claims, JwtSigner, TokenKind};
use crate::store::TokenStore;

/// Mints access/refresh pairs and persists the backing refresh record.
///
/// The record is saved before any tokens are handed back: a persistence
/// failure surfaces as `Storage` with nothing issued, so there is never a
/// live refresh token without a row behind it.
pub struct TokenIssuer {
    signer: JwtSigner,
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        signer: JwtSigner,
        store: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            signer,
            store,
            clock,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    pub async fn issue_pair(&self, account_id: Uuid) -> Result<IssuedPair, AuthError> {
        self.issue_linked(account_id, None).await
    }

    /// Mint a pair whose refresh record is linked to the record it replaces.
    /// Used by rotation to keep the audit lineage.
    pub(crate) async fn issue_linked(
        &self,
        account_id: Uuid,
        rotated_from: Option<Uuid>,
    ) -> Result<IssuedPair, AuthError> {
        let now = self.clock.now();
        let iat = now.unix_timestamp();
        let record_id = Uuid::new_v4();
        let refresh_expires = now + self.refresh_ttl;

        let access_token = self.signer.sign(&Claims {
            sub: account_id.to_string(),
            iat,
            exp: (now + self.access_ttl).unix_timestamp(),
            kind: TokenKind::Access,
            jti: None,
        })?;
        let refresh_token = self.signer.sign(&Claims {
            sub: account_id.to_string(),
            iat,
            exp: refresh_expires.unix_timestamp(),
            kind: TokenKind::Refresh,
            jti: Some(record_id.to_string()),
        })?;

        self.store
            .save(RefreshRecord {
                id: record_id,
                account_id,
                token_hash: fingerprint(&refresh_token),
                issued_at: now,
                expires_at: refresh_expires,
                state: TokenState::Active,
                rotated_from,
            })
            .await?;

        Ok(IssuedPair {
            access_token,
            refresh_token,
            access_ttl_secs: self.access_ttl.whole_seconds(),
        })
    }
}

/// SHA-256 hex digest of the issued refresh token, stored alongside the
/// record so the raw token never sits in the database.
fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
