//! Session issuance domain models

use super::common::StringUuid;
use super::context::SessionMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token material handed back after login or org switch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedSession {
    pub token: String,
    pub mode: SessionMode,
    pub current_org_id: Option<StringUuid>,
    pub expires_at: DateTime<Utc>,
}

/// Where an entry in the available-orgs listing came from.
/// Membership-origin entries win over platform-origin duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum OrgAccessOrigin {
    Membership { role_name: String, role_level: i32 },
    Platform,
}

/// One organization the identity can bind to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableOrg {
    pub org_id: StringUuid,
    pub name: String,
    #[serde(flatten)]
    pub origin: OrgAccessOrigin,
}
