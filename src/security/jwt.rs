use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Context tag baked into every token. A token is only ever valid in the
/// context its tag names; a refresh token presented where an access token is
/// expected (or vice versa) is a `WrongTokenType` failure, never a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed payload. Wire layout matches previously issued tokens exactly:
/// `sub`, `iat`, `exp`, `type`, plus `jti` on refresh tokens only (it carries
/// the id of the backing `RefreshRecord`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Subject parsed back to an account id. A valid signature over a
    /// non-UUID subject is still a malformed token.
    pub fn subject(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidSignature)
    }

    /// Refresh record id embedded in the token, if any.
    pub fn record_id(&self) -> Option<Uuid> {
        self.jti.as_deref().and_then(|j| Uuid::parse_str(j).ok())
    }
}

/// Stateless HMAC signer. Pure sign/verify over [`Claims`]; safe for
/// unlimited parallel calls. Expiry is deliberately NOT checked here — the
/// consuming component checks it against the injected clock, so signature
/// failures and expiry failures stay distinct outcomes.
#[derive(Clone)]
pub struct JwtSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
}

impl JwtSigner {
    pub fn new(secret: &str, algorithm: Algorithm) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.algorithm)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding)
            .map_err(|e| AuthError::Storage(format!("token encoding: {e}")))
    }

    /// Recompute and compare the signature; any mismatch or malformed
    /// structure collapses to `InvalidSignature`, independent of expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::InvalidSignature)?;
        Ok(data.claims)
    }
}
