//! Permission resolution: the applicable role and its grant list for a
//! given context

use crate::domain::{AuthContext, Grant, PermissionKey, PlatformRole, SessionMode, TenantRole};
use crate::error::Result;
use crate::repository::{GrantStore, RoleStore};
use serde::Serialize;
use std::sync::Arc;

/// The role a resolution landed on
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedRole {
    Tenant(TenantRole),
    Platform(PlatformRole),
}

impl ResolvedRole {
    pub fn name(&self) -> &str {
        match self {
            ResolvedRole::Tenant(role) => &role.name,
            ResolvedRole::Platform(role) => &role.name,
        }
    }
}

/// Resolution output: empty grants when no role applies
#[derive(Debug, Clone, Serialize, Default)]
pub struct ResolvedGrants {
    pub role: Option<ResolvedRole>,
    pub grants: Vec<Grant>,
}

/// Exact key match only; no wildcard or prefix matching exists.
pub fn find_grant(grants: &[Grant], key: PermissionKey) -> Option<&Grant> {
    grants.iter().find(|grant| grant.key == key)
}

pub struct PermissionResolver<R: RoleStore, G: GrantStore> {
    roles: Arc<R>,
    grants: Arc<G>,
}

impl<R: RoleStore, G: GrantStore> PermissionResolver<R, G> {
    pub fn new(roles: Arc<R>, grants: Arc<G>) -> Self {
        Self { roles, grants }
    }

    /// Fetch the applicable role and its grants.
    ///
    /// Tenant mode with no current org resolves to the empty set rather
    /// than erroring; the engine's context check owns that deny.
    pub async fn resolve(&self, ctx: &AuthContext) -> Result<ResolvedGrants> {
        match ctx.mode {
            SessionMode::Platform => {
                let Some(role) = self.roles.get_platform_role(ctx.identity_id).await? else {
                    return Ok(ResolvedGrants::default());
                };
                let grants = self.grants.get_grants(role.id).await?;
                Ok(ResolvedGrants {
                    role: Some(ResolvedRole::Platform(role)),
                    grants,
                })
            }
            SessionMode::Tenant => {
                let Some(org_id) = ctx.current_org_id else {
                    return Ok(ResolvedGrants::default());
                };
                let Some(role) = self.roles.get_tenant_role(ctx.identity_id, org_id).await? else {
                    return Ok(ResolvedGrants::default());
                };
                let grants = self.grants.get_grants(role.id).await?;
                Ok(ResolvedGrants {
                    role: Some(ResolvedRole::Tenant(role)),
                    grants,
                })
            }
        }
    }
}
