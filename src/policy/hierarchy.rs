//! Role-level hierarchy checks
//!
//! Canonical direction: a higher numeric `level` means more authority.
//! An identity may only assign or mutate roles whose level is strictly
//! below its own; equal-or-stronger targets are always rejected,
//! independent of any explicit grants.

use crate::domain::{Decision, DecisionCode, TenantRole};

/// Centralized strictly-lower-level assertion used by every
/// role-mutation flow (user update, role-permission update,
/// invitations).
pub fn assert_lower_level(acting: &TenantRole, target_level: i32) -> Decision {
    if target_level < acting.level {
        Decision::allow_plain("target role is weaker than acting role")
    } else {
        Decision::deny(
            DecisionCode::HierarchyViolation,
            format!(
                "role level {} is not below acting role '{}' (level {})",
                target_level, acting.name, acting.level
            ),
        )
    }
}
