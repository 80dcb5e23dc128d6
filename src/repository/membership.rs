//! Membership and platform org-access store

use crate::domain::{Membership, StringUuid};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Whether a Membership(identity, org) row exists
    async fn is_member(&self, identity_id: StringUuid, org_id: StringUuid) -> Result<bool>;

    /// All memberships held by an identity
    async fn find_memberships(&self, identity_id: StringUuid) -> Result<Vec<Membership>>;

    /// Explicit org allow-list for a platform identity.
    /// `None` means unrestricted (GLOBAL access level); `Some` is the
    /// LIMITED allow-list, possibly empty.
    async fn get_platform_org_access(
        &self,
        identity_id: StringUuid,
    ) -> Result<Option<Vec<StringUuid>>>;
}

pub struct MembershipStoreImpl {
    pool: MySqlPool,
}

impl MembershipStoreImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for MembershipStoreImpl {
    async fn is_member(&self, identity_id: StringUuid, org_id: StringUuid) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM memberships WHERE identity_id = ? AND org_id = ?")
                .bind(identity_id)
                .bind(org_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }

    async fn find_memberships(&self, identity_id: StringUuid) -> Result<Vec<Membership>> {
        let memberships = sqlx::query_as::<_, Membership>(
            "SELECT identity_id, org_id, joined_at FROM memberships WHERE identity_id = ?",
        )
        .bind(identity_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(memberships)
    }

    async fn get_platform_org_access(
        &self,
        identity_id: StringUuid,
    ) -> Result<Option<Vec<StringUuid>>> {
        // GLOBAL access level short-circuits to "unrestricted"
        let access_level: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT pr.access_level
            FROM platform_roles pr
            INNER JOIN identity_platform_roles ipr ON pr.id = ipr.role_id
            WHERE ipr.identity_id = ?
            "#,
        )
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await?;

        match access_level {
            Some((level,)) if level == "global" => Ok(None),
            _ => {
                let orgs: Vec<(StringUuid,)> =
                    sqlx::query_as("SELECT org_id FROM platform_org_access WHERE identity_id = ?")
                        .bind(identity_id)
                        .fetch_all(&self.pool)
                        .await?;

                Ok(Some(orgs.into_iter().map(|(org_id,)| org_id).collect()))
            }
        }
    }
}
