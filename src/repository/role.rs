//! Role store: tenant roles per (identity, org), platform role per identity

use crate::domain::{AccessLevel, PlatformRole, StringUuid, TenantRole};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// The identity's active role in the org, if any.
    /// At most one active TenantRole exists per (identity, org).
    async fn get_tenant_role(
        &self,
        identity_id: StringUuid,
        org_id: StringUuid,
    ) -> Result<Option<TenantRole>>;

    /// The identity's platform role, if any. At most one per identity.
    async fn get_platform_role(&self, identity_id: StringUuid) -> Result<Option<PlatformRole>>;
}

pub struct RoleStoreImpl {
    pool: MySqlPool,
}

impl RoleStoreImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Raw platform role row; `access_level` is CHAR and parsed leniently
/// (unknown values degrade to LIMITED)
#[derive(Debug, Clone, FromRow)]
struct PlatformRoleRow {
    id: StringUuid,
    name: String,
    is_root: bool,
    access_level: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlatformRoleRow> for PlatformRole {
    fn from(row: PlatformRoleRow) -> Self {
        PlatformRole {
            id: row.id,
            name: row.name,
            is_root: row.is_root,
            access_level: AccessLevel::parse(&row.access_level),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl RoleStore for RoleStoreImpl {
    async fn get_tenant_role(
        &self,
        identity_id: StringUuid,
        org_id: StringUuid,
    ) -> Result<Option<TenantRole>> {
        let role = sqlx::query_as::<_, TenantRole>(
            r#"
            SELECT r.id, r.org_id, r.name, r.level, r.created_at, r.updated_at
            FROM tenant_roles r
            INNER JOIN identity_tenant_roles itr ON r.id = itr.role_id
            WHERE itr.identity_id = ? AND r.org_id = ?
            "#,
        )
        .bind(identity_id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    async fn get_platform_role(&self, identity_id: StringUuid) -> Result<Option<PlatformRole>> {
        let row = sqlx::query_as::<_, PlatformRoleRow>(
            r#"
            SELECT pr.id, pr.name, pr.is_root, pr.access_level, pr.created_at, pr.updated_at
            FROM platform_roles pr
            INNER JOIN identity_platform_roles ipr ON pr.id = ipr.role_id
            WHERE ipr.identity_id = ?
            "#,
        )
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PlatformRole::from))
    }
}
