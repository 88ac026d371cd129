use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{Account, RefreshRecord, TokenState};
use crate::error::AuthError;
use crate::store::{AccountDirectory, TokenStore};

/// Durable token store backed by Postgres.
///
/// The linearization the rotation protocol depends on comes from the
/// conditional UPDATEs: `... WHERE id = $1 AND state = 'active'` applies to
/// at most one row exactly once, no matter how many rotations race.
///
/// Expected schema:
///
/// ```sql
/// CREATE TABLE refresh_tokens (
///     id            UUID PRIMARY KEY,
///     account_id    UUID NOT NULL,
///     token_hash    TEXT NOT NULL,
///     issued_at     TIMESTAMPTZ NOT NULL,
///     expires_at    TIMESTAMPTZ NOT NULL,
///     state         TEXT NOT NULL DEFAULT 'active',
///     rotated_from  UUID
/// );
/// ```
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &PgRow) -> Result<RefreshRecord, AuthError> {
    let state: String = row.get("state");
    let state = TokenState::parse(&state)
        .ok_or_else(|| AuthError::Storage(format!("unknown token state {state:?}")))?;
    Ok(RefreshRecord {
        id: row.get("id"),
        account_id: row.get("account_id"),
        token_hash: row.get("token_hash"),
        issued_at: row.get("issued_at"),
        expires_at: row.get("expires_at"),
        state,
        rotated_from: row.get("rotated_from"),
    })
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn save(&self, record: RefreshRecord) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO refresh_tokens \
             (id, account_id, token_hash, issued_at, expires_at, state, rotated_from) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(record.id)
        .bind(record.account_id)
        .bind(&record.token_hash)
        .bind(record.issued_at)
        .bind(record.expires_at)
        .bind(record.state.as_str())
        .bind(record.rotated_from)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<RefreshRecord>, AuthError> {
        let row = sqlx::query(
            "SELECT id, account_id, token_hash, issued_at, expires_at, state, rotated_from \
             FROM refresh_tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn compare_and_transition(
        &self,
        id: Uuid,
        from: TokenState,
        to: TokenState,
    ) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET state = $3 WHERE id = $1 AND state = $2",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn revoke_all_active(&self, account_id: Uuid) -> Result<u64, AuthError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET state = 'revoked' \
             WHERE account_id = $1 AND state = 'active'",
        )
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

/// Account directory over the `accounts` table. Read-only from the core's
/// point of view; account management belongs to the surrounding service.
pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        active: row.get("active"),
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, active FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(account_from_row))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, active FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(account_from_row))
    }
}
