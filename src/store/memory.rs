use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, RefreshRecord, TokenState};
use crate::error::AuthError;
use crate::store::{AccountDirectory, TokenStore};

/// In-memory token store. One mutex guards the whole map, so every state
/// transition — including the bulk revoke — is linearized, which is exactly
/// the atomicity contract the Postgres store gets from conditional UPDATEs.
#[derive(Default)]
pub struct MemoryTokenStore {
    records: Mutex<HashMap<Uuid, RefreshRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, record: RefreshRecord) -> Result<(), AuthError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.id) {
            return Err(AuthError::Storage(format!(
                "duplicate refresh record id {}",
                record.id
            )));
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<RefreshRecord>, AuthError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn compare_and_transition(
        &self,
        id: Uuid,
        from: TokenState,
        to: TokenState,
    ) -> Result<bool, AuthError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&id) {
            Some(record) if record.state == from => {
                record.state = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_active(&self, account_id: Uuid) -> Result<u64, AuthError> {
        let mut records = self.records.lock().unwrap();
        let mut count = 0;
        for record in records.values_mut() {
            if record.account_id == account_id && record.state == TokenState::Active {
                record.state = TokenState::Revoked;
                count += 1;
            }
        }
        Ok(count)
    }
}

/// In-memory account directory, keyed by id with an email index.
#[derive(Default)]
pub struct MemoryAccountDirectory {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account: Account) {
        self.accounts.lock().unwrap().insert(account.id, account);
    }

    pub fn set_active(&self, id: Uuid, active: bool) {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&id) {
            account.active = active;
        }
    }
}

#[async_trait]
impl AccountDirectory for MemoryAccountDirectory {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Duration, OffsetDateTime};

    fn record(account_id: Uuid) -> RefreshRecord {
        let now = OffsetDateTime::now_utc();
        RefreshRecord {
            id: Uuid::new_v4(),
            account_id,
            token_hash: "abc".into(),
            issued_at: now,
            expires_at: now + Duration::days(7),
            state: TokenState::Active,
            rotated_from: None,
        }
    }

    #[tokio::test]
    async fn transition_applies_only_from_expected_state() {
        let store = MemoryTokenStore::new();
        let rec = record(Uuid::new_v4());
        let id = rec.id;
        store.save(rec).await.unwrap();

        assert!(store
            .compare_and_transition(id, TokenState::Active, TokenState::Rotated)
            .await
            .unwrap());
        // Already terminal: the same transition must not apply twice.
        assert!(!store
            .compare_and_transition(id, TokenState::Active, TokenState::Rotated)
            .await
            .unwrap());
        assert_eq!(
            store.get_by_id(id).await.unwrap().unwrap().state,
            TokenState::Rotated
        );
    }

    #[tokio::test]
    async fn transition_on_missing_record_does_not_apply() {
        let store = MemoryTokenStore::new();
        assert!(!store
            .compare_and_transition(Uuid::new_v4(), TokenState::Active, TokenState::Revoked)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn revoke_all_touches_only_active_records_of_the_account() {
        let store = MemoryTokenStore::new();
        let account = Uuid::new_v4();
        let other = Uuid::new_v4();

        let a = record(account);
        let b = record(account);
        let c = record(other);
        let rotated_id = b.id;
        store.save(a.clone()).await.unwrap();
        store.save(b).await.unwrap();
        store.save(c.clone()).await.unwrap();
        store
            .compare_and_transition(rotated_id, TokenState::Active, TokenState::Rotated)
            .await
            .unwrap();

        assert_eq!(store.revoke_all_active(account).await.unwrap(), 1);
        assert_eq!(
            store.get_by_id(a.id).await.unwrap().unwrap().state,
            TokenState::Revoked
        );
        // Rotated stays rotated for audit, other accounts untouched.
        assert_eq!(
            store.get_by_id(rotated_id).await.unwrap().unwrap().state,
            TokenState::Rotated
        );
        assert_eq!(
            store.get_by_id(c.id).await.unwrap().unwrap().state,
            TokenState::Active
        );
    }

    #[tokio::test]
    async fn duplicate_save_is_rejected() {
        let store = MemoryTokenStore::new();
        let rec = record(Uuid::new_v4());
        store.save(rec.clone()).await.unwrap();
        assert!(matches!(
            store.save(rec).await,
            Err(AuthError::Storage(_))
        ));
    }
}
