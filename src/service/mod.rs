pub mod issuer;
pub mod revocation;
pub mod rotation;
pub mod validate;

use std::sync::Arc;

use uuid::Uuid;

use crate::clock::Clock;
use crate::config::{AuthConfig, VerifierKind};
use crate::domain::{Account, IssuedPair};
use crate::error::AuthError;
use crate::security::credentials::{
    CredentialVerifier, DelegatedVerifier, IdentityProvider, LocalVerifier,
};
use crate::security::jwt::JwtSigner;
use crate::store::{AccountDirectory, TokenStore};

pub use issuer::TokenIssuer;
pub use revocation::RevocationManager;
pub use rotation::RefreshCoordinator;
pub use validate::AccessValidator;

/// Facade over the token lifecycle components. This is the whole surface a
/// routing layer is expected to call; every collaborator is injected at
/// construction, nothing is looked up globally.
pub struct AuthCore {
    issuer: Arc<TokenIssuer>,
    coordinator: RefreshCoordinator,
    revocation: RevocationManager,
    validator: AccessValidator,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AuthCore {
    /// Wire the core with an explicit credential verifier.
    pub fn new(
        config: &AuthConfig,
        store: Arc<dyn TokenStore>,
        directory: Arc<dyn AccountDirectory>,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let signer = JwtSigner::from_config(config);
        let issuer = Arc::new(TokenIssuer::new(
            signer.clone(),
            Arc::clone(&store),
            Arc::clone(&clock),
            config,
        ));
        let coordinator = RefreshCoordinator::new(
            signer.clone(),
            Arc::clone(&store),
            Arc::clone(&directory),
            Arc::clone(&issuer),
            Arc::clone(&clock),
        );
        let revocation = RevocationManager::new(Arc::clone(&store));
        let validator = AccessValidator::new(signer, clock);
        Self {
            issuer,
            coordinator,
            revocation,
            validator,
            verifier,
        }
    }

    /// Wire the core with the verifier named by `config.verifier`.
    ///
    /// `Delegated` requires a provider; configuring it without one is a
    /// wiring error, not a cue to quietly run local verification instead.
    pub fn from_config(
        config: &AuthConfig,
        store: Arc<dyn TokenStore>,
        directory: Arc<dyn AccountDirectory>,
        clock: Arc<dyn Clock>,
        provider: Option<Arc<dyn IdentityProvider>>,
    ) -> Result<Self, AuthError> {
        match (config.verifier, provider) {
            (VerifierKind::Local, _) => Ok(Self::local(config, store, directory, clock)),
            (VerifierKind::Delegated, Some(provider)) => {
                Ok(Self::delegated(config, store, directory, clock, provider))
            }
            (VerifierKind::Delegated, None) => Err(AuthError::Storage(
                "delegated verifier configured without an identity provider".into(),
            )),
        }
    }

    /// Core verifying credentials against the directory's own hashes.
    pub fn local(
        config: &AuthConfig,
        store: Arc<dyn TokenStore>,
        directory: Arc<dyn AccountDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let verifier = Arc::new(LocalVerifier::new(Arc::clone(&directory)));
        Self::new(config, store, directory, clock, verifier)
    }

    /// Core delegating credential checks to an external identity provider.
    pub fn delegated(
        config: &AuthConfig,
        store: Arc<dyn TokenStore>,
        directory: Arc<dyn AccountDirectory>,
        clock: Arc<dyn Clock>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let verifier = Arc::new(DelegatedVerifier::new(provider, Arc::clone(&directory)));
        Self::new(config, store, directory, clock, verifier)
    }

    pub async fn issue_pair(&self, account_id: Uuid) -> Result<IssuedPair, AuthError> {
        self.issuer.issue_pair(account_id).await
    }

    pub async fn rotate(&self, refresh_token: &str) -> Result<IssuedPair, AuthError> {
        self.coordinator.rotate(refresh_token).await
    }

    pub async fn revoke(&self, record_id: Uuid) -> Result<(), AuthError> {
        self.revocation.revoke(record_id).await
    }

    pub async fn revoke_all(&self, account_id: Uuid) -> Result<u64, AuthError> {
        self.revocation.revoke_all(account_id).await
    }

    pub fn validate(&self, access_token: &str) -> Result<Uuid, AuthError> {
        self.validator.validate(access_token)
    }

    pub async fn verify_credential(
        &self,
        identity: &str,
        secret: &str,
    ) -> Result<Account, AuthError> {
        self.verifier.verify(identity, secret).await
    }
}
