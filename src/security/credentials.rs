use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Account;
use crate::error::AuthError;
use crate::security::password::{verify_password, DUMMY_HASH};
use crate::store::AccountDirectory;

/// Checks a presented secret for an account identified by id or email.
///
/// Two implementations exist — [`LocalVerifier`] against the directory's
/// stored hashes and [`DelegatedVerifier`] against an external identity
/// provider — selected by configuration. They are never chained: a provider
/// outage surfaces as `Storage` instead of being masked by a quiet local
/// retry that would look like a successful login.
///
/// All credential failures collapse to `AuthFailure`; callers cannot tell an
/// unknown identity from a wrong secret or an inactive account.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, identity: &str, secret: &str) -> Result<Account, AuthError>;
}

pub struct LocalVerifier {
    directory: Arc<dyn AccountDirectory>,
}

impl LocalVerifier {
    pub fn new(directory: Arc<dyn AccountDirectory>) -> Self {
        Self { directory }
    }

    async fn lookup(&self, identity: &str) -> Result<Option<Account>, AuthError> {
        match Uuid::parse_str(identity) {
            Ok(id) => self.directory.get_by_id(id).await,
            Err(_) => self.directory.get_by_email(identity).await,
        }
    }
}

#[async_trait]
impl CredentialVerifier for LocalVerifier {
    async fn verify(&self, identity: &str, secret: &str) -> Result<Account, AuthError> {
        let account = match self.lookup(identity).await? {
            Some(account) => account,
            None => {
                // Burn a comparable amount of hashing time so "unknown
                // account" and "wrong secret" are not distinguishable by
                // response latency.
                let _ = verify_password(secret, &DUMMY_HASH);
                return Err(AuthError::AuthFailure);
            }
        };

        if !verify_password(secret, &account.password_hash)? {
            return Err(AuthError::AuthFailure);
        }
        if !account.active {
            return Err(AuthError::AuthFailure);
        }
        Ok(account)
    }
}

/// Outcome of a delegated authentication attempt. `Denied` is a definitive
/// rejection; `Unavailable` means the provider could not be consulted at all.
#[derive(Debug)]
pub enum ProviderError {
    Denied,
    Unavailable(String),
}

/// External identity provider seam. The concrete provider (and any mock of
/// it) lives outside this crate.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, email: &str, secret: &str) -> Result<Uuid, ProviderError>;
}

pub struct DelegatedVerifier {
    provider: Arc<dyn IdentityProvider>,
    directory: Arc<dyn AccountDirectory>,
}

impl DelegatedVerifier {
    pub fn new(provider: Arc<dyn IdentityProvider>, directory: Arc<dyn AccountDirectory>) -> Self {
        Self {
            provider,
            directory,
        }
    }
}

#[async_trait]
impl CredentialVerifier for DelegatedVerifier {
    async fn verify(&self, identity: &str, secret: &str) -> Result<Account, AuthError> {
        let account_id = match self.provider.authenticate(identity, secret).await {
            Ok(id) => id,
            Err(ProviderError::Denied) => return Err(AuthError::AuthFailure),
            Err(ProviderError::Unavailable(reason)) => {
                return Err(AuthError::Storage(format!(
                    "identity provider unavailable: {reason}"
                )))
            }
        };

        let account = self
            .directory
            .get_by_id(account_id)
            .await?
            .ok_or(AuthError::AuthFailure)?;
        if !account.active {
            return Err(AuthError::AuthFailure);
        }
        Ok(account)
    }
}
