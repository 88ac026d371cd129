//! Authentication token lifecycle core.
//!
//! Issues paired access/refresh JWTs, validates access tokens statelessly,
//! rotates refresh tokens with single-use semantics (reuse of a spent token
//! is detected and rejected, even under races), and revokes tokens singly or
//! account-wide. Storage and account lookup are injected behind the
//! [`store::TokenStore`] and [`store::AccountDirectory`] traits; the HTTP
//! surface lives in the embedding service.

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod security;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AuthConfig, VerifierKind};
pub use domain::{Account, IssuedPair, RefreshRecord, TokenState};
pub use error::AuthError;
pub use security::credentials::{CredentialVerifier, IdentityProvider, ProviderError};
pub use security::jwt::{Claims, JwtSigner, TokenKind};
pub use service::AuthCore;
