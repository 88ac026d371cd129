//! Contracts required of the external persistence collaborators.
//!
//! The token store is the only shared mutable resource in the core. Its
//! `compare_and_transition` and `revoke_all_active` operations MUST be atomic
//! with respect to each other: the whole replay defense reduces to the store
//! linearizing `Active -> Rotated` / `Active -> Revoked` per record. Callers
//! in this crate never emulate the transition with a separate read and write.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, RefreshRecord, TokenState};
use crate::error::AuthError;

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Insert a new refresh record. The id must be fresh.
    async fn save(&self, record: RefreshRecord) -> Result<(), AuthError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<RefreshRecord>, AuthError>;

    /// Atomic conditional transition: set `state = to` iff the record exists
    /// and its current state equals `from`. Returns whether it applied.
    async fn compare_and_transition(
        &self,
        id: Uuid,
        from: TokenState,
        to: TokenState,
    ) -> Result<bool, AuthError>;

    /// Atomically move every `Active` record owned by the account to
    /// `Revoked`; returns how many were transitioned.
    async fn revoke_all_active(&self, account_id: Uuid) -> Result<u64, AuthError>;
}

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;
}
