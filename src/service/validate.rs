use std::sync::Arc;

use uuid::Uuid;

use crate::clock::Clock;
use crate::error::AuthError;
use crate::security::jwt::{JwtSigner, TokenKind};

/// Stateless access-token validation: signature, type tag, expiry, subject.
///
/// Deliberately never consults the token store — access tokens are not
/// individually revocable in this design. Revocation cuts off future
/// rotations only; the short access TTL bounds the exposure window. This is
/// a documented performance/revocability trade-off, not an oversight.
pub struct AccessValidator {
    signer: JwtSigner,
    clock: Arc<dyn Clock>,
}

impl AccessValidator {
    pub fn new(signer: JwtSigner, clock: Arc<dyn Clock>) -> Self {
        Self { signer, clock }
    }

    /// Returns the subject account id. Fails with `Expired` at or after the
    /// token's `exp` instant.
    pub fn validate(&self, access_token: &str) -> Result<Uuid, AuthError> {
        let claims = self.signer.verify(access_token)?;
        if claims.kind != TokenKind::Access {
            return Err(AuthError::WrongTokenType);
        }
        if claims.exp <= self.clock.now().unix_timestamp() {
            return Err(AuthError::Expired);
        }
        claims.subject()
    }
}
