use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::TokenState;
use crate::error::AuthError;
use crate::store::TokenStore;

/// Explicit termination of refresh tokens, singly (logout) or account-wide
/// (logout everywhere, stolen-token escalation).
pub struct RevocationManager {
    store: Arc<dyn TokenStore>,
}

impl RevocationManager {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Revoke one record. Idempotent: a record that is already `Rotated` or
    /// `Revoked` (or does not exist) is left as-is without error.
    pub async fn revoke(&self, record_id: Uuid) -> Result<(), AuthError> {
        self.store
            .compare_and_transition(record_id, TokenState::Active, TokenState::Revoked)
            .await?;
        Ok(())
    }

    /// Revoke every `Active` record for the account via the store's atomic
    /// bulk transition. The sweep runs twice: a rotation whose consume won
    /// just before the first pass may persist its successor just after, and
    /// the second pass picks that successor up. Returns the total number of
    /// records transitioned.
    pub async fn revoke_all(&self, account_id: Uuid) -> Result<u64, AuthError> {
        let mut count = self.store.revoke_all_active(account_id).await?;
        count += self.store.revoke_all_active(account_id).await?;
        info!(account = %account_id, count, "revoked all active refresh tokens");
        Ok(count)
    }
}
