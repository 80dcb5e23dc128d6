//! Organization and membership domain models

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Organization entity (the tenant boundary)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: StringUuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Organization {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            slug: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Membership row: the (identity, org) relation required for any
/// tenant-mode grant to take effect.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub identity_id: StringUuid,
    pub org_id: StringUuid,
    pub joined_at: DateTime<Utc>,
}

impl Default for Membership {
    fn default() -> Self {
        Self {
            identity_id: StringUuid::new_v4(),
            org_id: StringUuid::new_v4(),
            joined_at: Utc::now(),
        }
    }
}

/// Explicit allow-list entry for LIMITED-access platform identities
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlatformOrgAccess {
    pub identity_id: StringUuid,
    pub org_id: StringUuid,
    pub granted_at: DateTime<Utc>,
}
