//! Common test utilities: an in-memory directory backing every store
//! port, so engine and session flows run without a database.

#![allow(dead_code)]

use async_trait::async_trait;
use eventra_authz::domain::{
    AccessLevel, AuthContext, Grant, Membership, Organization, PermissionKey, PlatformRole, Scope,
    SessionMode, StringUuid, TenantRole,
};
use eventra_authz::error::Result;
use eventra_authz::repository::{GrantStore, MembershipStore, OrgStore, RoleStore};
use std::collections::HashMap;

/// An in-memory identity directory implementing all four store ports.
/// Populate it with the builder methods, wrap it in an `Arc`, and hand
/// clones of that `Arc` to every service slot.
#[derive(Default)]
pub struct InMemoryDirectory {
    orgs: Vec<Organization>,
    memberships: Vec<Membership>,
    tenant_roles: HashMap<(StringUuid, StringUuid), TenantRole>,
    platform_roles: HashMap<StringUuid, PlatformRole>,
    platform_access: HashMap<StringUuid, Vec<StringUuid>>,
    grants: HashMap<StringUuid, Vec<Grant>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_org(&mut self, name: &str) -> StringUuid {
        let org = Organization {
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            ..Default::default()
        };
        let id = org.id;
        self.orgs.push(org);
        id
    }

    pub fn add_member(&mut self, identity_id: StringUuid, org_id: StringUuid) {
        self.memberships.push(Membership {
            identity_id,
            org_id,
            ..Default::default()
        });
    }

    /// Give `identity_id` a tenant role in `org_id` and return the role
    /// id for attaching grants.
    pub fn add_tenant_role(
        &mut self,
        identity_id: StringUuid,
        org_id: StringUuid,
        name: &str,
        level: i32,
    ) -> StringUuid {
        let role = TenantRole {
            org_id,
            name: name.to_string(),
            level,
            ..Default::default()
        };
        let role_id = role.id;
        self.tenant_roles.insert((identity_id, org_id), role);
        role_id
    }

    pub fn add_platform_role(
        &mut self,
        identity_id: StringUuid,
        is_root: bool,
        access_level: AccessLevel,
    ) -> StringUuid {
        let role = PlatformRole {
            name: if is_root { "ROOT" } else { "SUPPORT" }.to_string(),
            is_root,
            access_level,
            ..Default::default()
        };
        let role_id = role.id;
        self.platform_roles.insert(identity_id, role);
        role_id
    }

    pub fn allow_platform_org(&mut self, identity_id: StringUuid, org_id: StringUuid) {
        self.platform_access
            .entry(identity_id)
            .or_default()
            .push(org_id);
    }

    pub fn add_grant(&mut self, role_id: StringUuid, key: PermissionKey, scope: Scope) {
        self.grants
            .entry(role_id)
            .or_default()
            .push(Grant::new(key, scope));
    }
}

#[async_trait]
impl MembershipStore for InMemoryDirectory {
    async fn is_member(&self, identity_id: StringUuid, org_id: StringUuid) -> Result<bool> {
        Ok(self
            .memberships
            .iter()
            .any(|m| m.identity_id == identity_id && m.org_id == org_id))
    }

    async fn find_memberships(&self, identity_id: StringUuid) -> Result<Vec<Membership>> {
        Ok(self
            .memberships
            .iter()
            .filter(|m| m.identity_id == identity_id)
            .cloned()
            .collect())
    }

    async fn get_platform_org_access(
        &self,
        identity_id: StringUuid,
    ) -> Result<Option<Vec<StringUuid>>> {
        match self.platform_roles.get(&identity_id) {
            Some(role) if role.access_level == AccessLevel::Global => Ok(None),
            _ => Ok(Some(
                self.platform_access
                    .get(&identity_id)
                    .cloned()
                    .unwrap_or_default(),
            )),
        }
    }
}

#[async_trait]
impl RoleStore for InMemoryDirectory {
    async fn get_tenant_role(
        &self,
        identity_id: StringUuid,
        org_id: StringUuid,
    ) -> Result<Option<TenantRole>> {
        Ok(self.tenant_roles.get(&(identity_id, org_id)).cloned())
    }

    async fn get_platform_role(&self, identity_id: StringUuid) -> Result<Option<PlatformRole>> {
        Ok(self.platform_roles.get(&identity_id).cloned())
    }
}

#[async_trait]
impl GrantStore for InMemoryDirectory {
    async fn get_grants(&self, role_id: StringUuid) -> Result<Vec<Grant>> {
        Ok(self.grants.get(&role_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl OrgStore for InMemoryDirectory {
    async fn list_all(&self) -> Result<Vec<Organization>> {
        Ok(self.orgs.clone())
    }

    async fn find_by_ids(&self, ids: Vec<StringUuid>) -> Result<Vec<Organization>> {
        Ok(self
            .orgs
            .iter()
            .filter(|o| ids.contains(&o.id))
            .cloned()
            .collect())
    }
}

/// Tenant-mode evaluation context, optionally bound to an org
pub fn tenant_ctx(identity_id: StringUuid, org_id: Option<StringUuid>) -> AuthContext {
    AuthContext {
        identity_id,
        mode: SessionMode::Tenant,
        is_platform: false,
        is_root: false,
        current_org_id: org_id,
    }
}

/// Platform-mode evaluation context; never org-bound
pub fn platform_ctx(identity_id: StringUuid, is_root: bool) -> AuthContext {
    AuthContext {
        identity_id,
        mode: SessionMode::Platform,
        is_platform: true,
        is_root,
        current_org_id: None,
    }
}
