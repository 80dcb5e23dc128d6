//! Scope evaluation: does one grant's scope cover the target resource?

use crate::domain::{AuthContext, ResourceContext, Scope};

/// Pure scope test for non-root identities (root short-circuits before
/// this point).
///
/// `Org` is deliberately unconditional: the organization boundary is
/// already enforced by the engine's context check before evaluation
/// reaches a grant, so the scope carries no additional restriction.
pub fn evaluate(scope: Scope, ctx: &AuthContext, resource: &ResourceContext) -> bool {
    match scope {
        Scope::Any => true,
        Scope::Org => true,
        Scope::Assigned => resource
            .assigned_identity_ids
            .iter()
            .any(|id| *id == ctx.identity_id),
        Scope::Own => resource
            .resource_owner_id
            .map(|owner| owner == ctx.identity_id)
            .unwrap_or(false),
    }
}
