use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account as seen by the token core. Owned by the account directory; the
/// core reads `id` and `active`, the credential verifier additionally reads
/// `password_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub active: bool,
}
