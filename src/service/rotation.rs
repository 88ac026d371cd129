use std::sync::Arc;

use tracing::warn;

use crate::clock::Clock;
use crate::domain::{IssuedPair, TokenState};
use crate::error::AuthError;
use crate::security::jwt::{JwtSigner, TokenKind};
use crate::service::issuer::TokenIssuer;
use crate::store::{AccountDirectory, TokenStore};

/// Executes the single-use rotation protocol.
///
/// Rotation is a sequence of hard gates; the one that matters is the atomic
/// `Active -> Rotated` transition, performed as a single store call. Two
/// rotations racing on the same token both reach the store, the store applies
/// exactly one, and the loser is reported as `ReuseDetected` — which is also
/// what the legitimate client sees after its token was stolen and spent.
/// Single-use rotation turns token theft into a detectable event instead of a
/// silent long-lived compromise.
pub struct RefreshCoordinator {
    signer: JwtSigner,
    store: Arc<dyn TokenStore>,
    directory: Arc<dyn AccountDirectory>,
    issuer: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl RefreshCoordinator {
    pub fn new(
        signer: JwtSigner,
        store: Arc<dyn TokenStore>,
        directory: Arc<dyn AccountDirectory>,
        issuer: Arc<TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            signer,
            store,
            directory,
            issuer,
            clock,
        }
    }

    pub async fn rotate(&self, refresh_token: &str) -> Result<IssuedPair, AuthError> {
        let claims = self.signer.verify(refresh_token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::WrongTokenType);
        }
        // A signed refresh token without a usable record id cannot match any
        // record; same outcome as a deleted one.
        let record_id = claims.record_id().ok_or(AuthError::NotFound)?;

        let record = self
            .store
            .get_by_id(record_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        if claims.subject()? != record.account_id {
            return Err(AuthError::NotFound);
        }

        let applied = self
            .store
            .compare_and_transition(record_id, TokenState::Active, TokenState::Rotated)
            .await?;
        if !applied {
            warn!(
                record = %record_id,
                account = %record.account_id,
                "refresh token reuse detected"
            );
            return Err(AuthError::ReuseDetected);
        }

        // The CAS won, but an expired record must still never mint a pair.
        // It stays Rotated, which is terminal either way.
        if record.is_expired(self.clock.now()) {
            return Err(AuthError::Expired);
        }

        let account = self
            .directory
            .get_by_id(record.account_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        if !account.active {
            return Err(AuthError::AccountInactive);
        }

        self.issuer.issue_linked(account.id, Some(record_id)).await
    }
}
