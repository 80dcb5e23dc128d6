//! Organization directory lookups (display names for org listings)

use crate::domain::{Organization, StringUuid};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrgStore: Send + Sync {
    /// Every organization in the system (GLOBAL platform reach)
    async fn list_all(&self) -> Result<Vec<Organization>>;

    /// Organizations by id; missing ids are silently absent
    async fn find_by_ids(&self, ids: Vec<StringUuid>) -> Result<Vec<Organization>>;
}

pub struct OrgStoreImpl {
    pool: MySqlPool,
}

impl OrgStoreImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrgStore for OrgStoreImpl {
    async fn list_all(&self) -> Result<Vec<Organization>> {
        let orgs = sqlx::query_as::<_, Organization>(
            "SELECT id, name, slug, created_at, updated_at FROM organizations",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orgs)
    }

    async fn find_by_ids(&self, ids: Vec<StringUuid>) -> Result<Vec<Organization>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name, slug, created_at, updated_at FROM organizations WHERE id IN ({})",
            placeholders
        );

        let mut query = sqlx::query_as::<_, Organization>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let orgs = query.fetch_all(&self.pool).await?;
        Ok(orgs)
    }
}
