//! Session issuance and org binding
//!
//! Login-time mode selection, org switching and the available-orgs
//! listing. Credential verification happens in an external collaborator;
//! this service starts from an already-authenticated identity id.

use crate::domain::{
    AuthContext, AvailableOrg, IssuedSession, OrgAccessOrigin, SessionMode, StringUuid,
};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::policy::AuthorizationService;
use crate::repository::{GrantStore, MembershipStore, OrgStore, RoleStore};
use std::collections::HashMap;
use std::sync::Arc;

pub struct SessionService<M, R, G, O>
where
    M: MembershipStore,
    R: RoleStore,
    G: GrantStore,
    O: OrgStore,
{
    authz: Arc<AuthorizationService<M, R, G>>,
    membership: Arc<M>,
    roles: Arc<R>,
    orgs: Arc<O>,
    jwt: JwtManager,
}

impl<M, R, G, O> SessionService<M, R, G, O>
where
    M: MembershipStore,
    R: RoleStore,
    G: GrantStore,
    O: OrgStore,
{
    pub fn new(
        authz: Arc<AuthorizationService<M, R, G>>,
        membership: Arc<M>,
        roles: Arc<R>,
        orgs: Arc<O>,
        jwt: JwtManager,
    ) -> Self {
        Self {
            authz,
            membership,
            roles,
            orgs,
            jwt,
        }
    }

    /// Classify a freshly authenticated identity and issue its session.
    ///
    /// Platform-role holders get a platform-mode token, unbound to any
    /// org. Single-membership identities come out already bound; with
    /// several memberships the token carries no org and the
    /// NO_TENANT_CONTEXT deny governs until `switch_org`. An identity
    /// with neither memberships nor a platform role is rejected before
    /// any token exists.
    pub async fn establish_session(&self, identity_id: StringUuid) -> Result<IssuedSession> {
        if self.roles.get_platform_role(identity_id).await?.is_some() {
            let (token, expires_at) =
                self.jwt
                    .issue_session(identity_id, SessionMode::Platform, None)?;
            tracing::info!(identity = %identity_id, "issued platform session");
            return Ok(IssuedSession {
                token,
                mode: SessionMode::Platform,
                current_org_id: None,
                expires_at,
            });
        }

        let memberships = self.membership.find_memberships(identity_id).await?;
        let current_org_id = match memberships.len() {
            0 => {
                return Err(AppError::Forbidden(
                    "No organization membership; onboarding required".to_string(),
                ))
            }
            1 => Some(memberships[0].org_id),
            _ => None,
        };

        let (token, expires_at) =
            self.jwt
                .issue_session(identity_id, SessionMode::Tenant, current_org_id)?;
        tracing::info!(
            identity = %identity_id,
            bound = current_org_id.is_some(),
            "issued tenant session"
        );
        Ok(IssuedSession {
            token,
            mode: SessionMode::Tenant,
            current_org_id,
            expires_at,
        })
    }

    /// Re-bind an identity to a different organization.
    ///
    /// Runs the engine's org-access check (membership OR platform
    /// reach); a failing decision surfaces as a Forbidden fault.
    pub async fn switch_org(
        &self,
        ctx: &AuthContext,
        target_org_id: StringUuid,
    ) -> Result<IssuedSession> {
        self.authz
            .verify_org_access(ctx, target_org_id)
            .await?
            .into_result()?;

        let (token, expires_at) =
            self.jwt
                .issue_session(ctx.identity_id, SessionMode::Tenant, Some(target_org_id))?;
        tracing::info!(identity = %ctx.identity_id, org = %target_org_id, "switched organization");
        Ok(IssuedSession {
            token,
            mode: SessionMode::Tenant,
            current_org_id: Some(target_org_id),
            expires_at,
        })
    }

    /// Every organization the identity can bind to, deduplicated by org
    /// id (membership-origin wins over platform-origin) and sorted by
    /// display name ascending.
    pub async fn available_orgs(&self, ctx: &AuthContext) -> Result<Vec<AvailableOrg>> {
        let mut by_org: HashMap<StringUuid, OrgAccessOrigin> = HashMap::new();

        // (a) membership + tenant role
        let memberships = self.membership.find_memberships(ctx.identity_id).await?;
        for membership in &memberships {
            if let Some(role) = self
                .roles
                .get_tenant_role(ctx.identity_id, membership.org_id)
                .await?
            {
                by_org.insert(
                    membership.org_id,
                    OrgAccessOrigin::Membership {
                        role_name: role.name,
                        role_level: role.level,
                    },
                );
            }
        }

        // (b) platform reach, never overriding a membership entry
        let platform_org_ids = if self.roles.get_platform_role(ctx.identity_id).await?.is_some() {
            match self
                .membership
                .get_platform_org_access(ctx.identity_id)
                .await?
            {
                None => self.orgs.list_all().await?.into_iter().map(|o| o.id).collect(),
                Some(ids) => ids,
            }
        } else {
            vec![]
        };
        for org_id in platform_org_ids {
            by_org.entry(org_id).or_insert(OrgAccessOrigin::Platform);
        }

        let orgs = self.orgs.find_by_ids(by_org.keys().copied().collect()).await?;
        let mut out: Vec<AvailableOrg> = orgs
            .into_iter()
            .filter_map(|org| {
                by_org.remove(&org.id).map(|origin| AvailableOrg {
                    org_id: org.id,
                    name: org.name,
                    origin,
                })
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}
