//! The authorization decision engine
//!
//! Stateless and side-effect free: consulted per call, discarded after.
//! "Not authorized" is a `Decision` value; only infrastructure faults
//! (store unreachable) propagate as errors, and callers must treat such
//! faults as deny, never as implicit allow.

pub mod context;
pub mod hierarchy;
pub mod resolver;
pub mod scope;

pub use context::AuthContextBuilder;
pub use hierarchy::assert_lower_level;
pub use resolver::{PermissionResolver, ResolvedGrants, ResolvedRole};

use crate::domain::{
    AuthContext, Decision, DecisionCode, DecisionDetails, PermissionKey, ResourceContext,
    SessionMode, StringUuid,
};
use crate::error::Result;
use crate::repository::{GrantStore, MembershipStore, RoleStore};
use std::collections::HashMap;
use std::sync::Arc;

pub struct AuthorizationService<M: MembershipStore, R: RoleStore, G: GrantStore> {
    membership: Arc<M>,
    resolver: PermissionResolver<R, G>,
}

impl<M: MembershipStore, R: RoleStore, G: GrantStore> AuthorizationService<M, R, G> {
    pub fn new(membership: Arc<M>, roles: Arc<R>, grants: Arc<G>) -> Self {
        Self {
            membership,
            resolver: PermissionResolver::new(roles, grants),
        }
    }

    pub fn resolver(&self) -> &PermissionResolver<R, G> {
        &self.resolver
    }

    /// Decide whether `ctx` may perform `key` against `resource`.
    ///
    /// Ordered, short-circuiting: root bypass, context check, grant
    /// lookup, scope evaluation.
    pub async fn can(
        &self,
        key: PermissionKey,
        ctx: &AuthContext,
        resource: &ResourceContext,
    ) -> Result<Decision> {
        if ctx.is_root {
            return Ok(Decision::allow_root());
        }

        if let Some(deny) = self.context_check(ctx, resource.resource_org_id).await? {
            return Ok(deny);
        }

        let resolved = self.resolver.resolve(ctx).await?;
        let Some(grant) = resolver::find_grant(&resolved.grants, key) else {
            return Ok(Decision::deny(
                DecisionCode::MissingPermission,
                format!("no grant for '{}'", key),
            )
            .with_details(DecisionDetails {
                required_permission: Some(key),
                ..Default::default()
            }));
        };

        if !scope::evaluate(grant.scope, ctx, resource) {
            return Ok(Decision::deny(
                DecisionCode::ScopeDenied,
                format!("grant for '{}' requires scope '{}'", key, grant.scope.as_str()),
            )
            .with_details(DecisionDetails {
                required_permission: Some(key),
                required_scope: Some(grant.scope),
                ..Default::default()
            }));
        }

        Ok(Decision::allow(key, grant.scope))
    }

    /// Logical OR over keys: the first allowing decision wins. When
    /// none allow, a single MISSING_PERMISSION deny references every
    /// candidate key.
    pub async fn can_any(
        &self,
        keys: &[PermissionKey],
        ctx: &AuthContext,
        resource: &ResourceContext,
    ) -> Result<Decision> {
        if ctx.is_root {
            return Ok(Decision::allow_root());
        }

        if let Some(deny) = self.context_check(ctx, resource.resource_org_id).await? {
            return Ok(deny);
        }

        let resolved = self.resolver.resolve(ctx).await?;
        for key in keys {
            if let Some(grant) = resolver::find_grant(&resolved.grants, *key) {
                if scope::evaluate(grant.scope, ctx, resource) {
                    return Ok(Decision::allow(*key, grant.scope));
                }
            }
        }

        Ok(Decision::deny(
            DecisionCode::MissingPermission,
            format!(
                "none of [{}] granted",
                keys.iter()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )
        .with_details(DecisionDetails {
            candidates: keys.to_vec(),
            ..Default::default()
        }))
    }

    /// Per-key map of independent decisions. No implicit AND: the
    /// caller composes. The grant set is resolved once and evaluated
    /// against every key.
    pub async fn can_all(
        &self,
        keys: &[PermissionKey],
        ctx: &AuthContext,
        resource: &ResourceContext,
    ) -> Result<HashMap<PermissionKey, Decision>> {
        if ctx.is_root {
            return Ok(keys
                .iter()
                .map(|key| (*key, Decision::allow_root()))
                .collect());
        }

        if let Some(deny) = self.context_check(ctx, resource.resource_org_id).await? {
            return Ok(keys.iter().map(|key| (*key, deny.clone())).collect());
        }

        let resolved = self.resolver.resolve(ctx).await?;
        let mut out = HashMap::with_capacity(keys.len());
        for key in keys {
            let decision = match resolver::find_grant(&resolved.grants, *key) {
                Some(grant) if scope::evaluate(grant.scope, ctx, resource) => {
                    Decision::allow(*key, grant.scope)
                }
                Some(grant) => Decision::deny(
                    DecisionCode::ScopeDenied,
                    format!(
                        "grant for '{}' requires scope '{}'",
                        key,
                        grant.scope.as_str()
                    ),
                )
                .with_details(DecisionDetails {
                    required_permission: Some(*key),
                    required_scope: Some(grant.scope),
                    ..Default::default()
                }),
                None => Decision::deny(
                    DecisionCode::MissingPermission,
                    format!("no grant for '{}'", key),
                )
                .with_details(DecisionDetails {
                    required_permission: Some(*key),
                    ..Default::default()
                }),
            };
            out.insert(*key, decision);
        }

        Ok(out)
    }

    /// The context check factored out for reuse by org switching:
    /// membership OR platform reach to `org_id`.
    pub async fn verify_org_access(
        &self,
        ctx: &AuthContext,
        org_id: StringUuid,
    ) -> Result<Decision> {
        if ctx.is_root {
            return Ok(Decision::allow_root());
        }

        if self.membership.is_member(ctx.identity_id, org_id).await? {
            return Ok(Decision::allow_plain("organization member"));
        }

        if ctx.is_platform {
            return match self
                .membership
                .get_platform_org_access(ctx.identity_id)
                .await?
            {
                None => Ok(Decision::allow_plain("global platform access")),
                Some(allowed) if allowed.contains(&org_id) => {
                    Ok(Decision::allow_plain("platform org access"))
                }
                Some(_) => Ok(Decision::deny(
                    DecisionCode::PlatformTenantAccessDenied,
                    "limited platform access does not cover this organization",
                )),
            };
        }

        Ok(Decision::deny(
            DecisionCode::NotTenantMember,
            "no membership for this organization",
        ))
    }

    /// Step-2 context check of the decision pipeline. `Some(deny)`
    /// short-circuits evaluation, `None` means carry on.
    async fn context_check(
        &self,
        ctx: &AuthContext,
        resource_org_id: Option<StringUuid>,
    ) -> Result<Option<Decision>> {
        match ctx.mode {
            SessionMode::Tenant => {
                let Some(org_id) = ctx.current_org_id else {
                    return Ok(Some(Decision::deny(
                        DecisionCode::NoTenantContext,
                        "no organization selected",
                    )));
                };
                if !self.membership.is_member(ctx.identity_id, org_id).await? {
                    return Ok(Some(Decision::deny(
                        DecisionCode::NotTenantMember,
                        "no membership for the selected organization",
                    )));
                }
                Ok(None)
            }
            SessionMode::Platform => {
                let Some(org_id) = resource_org_id else {
                    return Ok(None);
                };
                match self
                    .membership
                    .get_platform_org_access(ctx.identity_id)
                    .await?
                {
                    // None = GLOBAL access, every org reachable
                    None => Ok(None),
                    Some(allowed) if allowed.contains(&org_id) => Ok(None),
                    Some(_) => Ok(Some(Decision::deny(
                        DecisionCode::PlatformTenantAccessDenied,
                        "limited platform access does not cover the resource organization",
                    ))),
                }
            }
        }
    }
}
