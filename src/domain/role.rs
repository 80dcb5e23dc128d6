//! Role domain models: tenant roles (org-scoped, levelled) and
//! platform roles (global, optionally root)

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role scoped to exactly one organization.
///
/// `level` is the hierarchy rank. Higher numeric level means more
/// authority; an identity may only mutate roles whose level is strictly
/// below its own (see `policy::hierarchy`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TenantRole {
    pub id: StringUuid,
    pub org_id: StringUuid,
    pub name: String,
    pub level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for TenantRole {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            org_id: StringUuid::nil(),
            name: String::new(),
            level: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// How far a platform identity reaches across organizations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Every organization is implicitly reachable
    Global,
    /// Restricted to explicit `platform_org_access` rows
    Limited,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Global => "global",
            AccessLevel::Limited => "limited",
        }
    }

    /// Unknown values degrade to `Limited` so an unrecognized row can
    /// never widen reach.
    pub fn parse(s: &str) -> Self {
        match s {
            "global" => AccessLevel::Global,
            _ => AccessLevel::Limited,
        }
    }
}

/// Global role held by at most one assignment per identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRole {
    pub id: StringUuid,
    pub name: String,
    pub is_root: bool,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for PlatformRole {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            is_root: false,
            access_level: AccessLevel::Limited,
            created_at: now,
            updated_at: now,
        }
    }
}
