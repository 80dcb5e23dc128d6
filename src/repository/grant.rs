//! Grant store: (permission key, scope) rows per role

use crate::domain::{Grant, PermissionKey, Scope, StringUuid};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// All grants bundled into a role (tenant or platform).
    async fn get_grants(&self, role_id: StringUuid) -> Result<Vec<Grant>>;
}

pub struct GrantStoreImpl {
    pool: MySqlPool,
}

impl GrantStoreImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, FromRow)]
struct GrantRow {
    permission_key: String,
    scope: String,
}

impl GrantRow {
    /// Rows that do not map onto the closed permission table are
    /// dropped: an inexpressible grant must never allow anything.
    fn into_grant(self) -> Option<Grant> {
        let key: PermissionKey = match self.permission_key.parse() {
            Ok(key) => key,
            Err(_) => {
                tracing::warn!(key = %self.permission_key, "dropping grant with unknown permission key");
                return None;
            }
        };
        let scope = match Scope::parse(&self.scope) {
            Some(scope) => scope,
            None => {
                tracing::warn!(key = %self.permission_key, scope = %self.scope, "dropping grant with unknown scope");
                return None;
            }
        };
        Some(Grant::new(key, scope))
    }
}

#[async_trait]
impl GrantStore for GrantStoreImpl {
    async fn get_grants(&self, role_id: StringUuid) -> Result<Vec<Grant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            "SELECT permission_key, scope FROM role_grants WHERE role_id = ?",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(GrantRow::into_grant).collect())
    }
}
