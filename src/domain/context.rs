//! Per-call evaluation inputs and the engine's output
//!
//! `AuthContext`, `ResourceContext` and `Decision` are constructed and
//! discarded per call; nothing here is persisted.

use super::common::StringUuid;
use super::permission::{PermissionKey, Scope};
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Identity mode carried by a session token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Scoped to one organization at a time
    Tenant,
    /// Operates globally, outside any single org's membership model
    Platform,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Tenant => "tenant",
            SessionMode::Platform => "platform",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tenant" => Some(SessionMode::Tenant),
            "platform" => Some(SessionMode::Platform),
            _ => None,
        }
    }
}

/// Minimal verified token, as handed over by the token boundary.
/// Signature and expiry verification happened before this point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityToken {
    pub subject_id: StringUuid,
    pub mode: SessionMode,
    pub current_org_id: Option<StringUuid>,
}

/// Full evaluation context, expanded from an `IdentityToken` once per
/// request by `policy::context::AuthContextBuilder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub identity_id: StringUuid,
    pub mode: SessionMode,
    pub is_platform: bool,
    pub is_root: bool,
    pub current_org_id: Option<StringUuid>,
}

/// Caller-supplied description of the target resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContext {
    pub resource_owner_id: Option<StringUuid>,
    #[serde(default)]
    pub assigned_identity_ids: Vec<StringUuid>,
    pub resource_org_id: Option<StringUuid>,
}

/// Classified reason attached to every decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionCode {
    Ok,
    /// No org selected yet (tenant mode with no current org)
    NoTenantContext,
    /// Org selected, but no membership row for it
    NotTenantMember,
    /// Limited-access platform identity without an explicit grant to the target org
    PlatformTenantAccessDenied,
    /// No grant for the requested key
    MissingPermission,
    /// Grant exists, scope unmet
    ScopeDenied,
    /// Reserved for feature-gating integration (`ModuleGate`)
    ModuleDisabled,
    /// Role-level comparison failed during a role-mutation operation
    HierarchyViolation,
}

impl DecisionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionCode::Ok => "OK",
            DecisionCode::NoTenantContext => "NO_TENANT_CONTEXT",
            DecisionCode::NotTenantMember => "NOT_TENANT_MEMBER",
            DecisionCode::PlatformTenantAccessDenied => "PLATFORM_TENANT_ACCESS_DENIED",
            DecisionCode::MissingPermission => "MISSING_PERMISSION",
            DecisionCode::ScopeDenied => "SCOPE_DENIED",
            DecisionCode::ModuleDisabled => "MODULE_DISABLED",
            DecisionCode::HierarchyViolation => "HIERARCHY_VIOLATION",
        }
    }
}

/// Structured details so callers need not re-derive context to report a
/// precise error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<PermissionKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_scope: Option<Scope>,
    /// All keys considered by a `can_any` evaluation
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub candidates: Vec<PermissionKey>,
    /// True when the allow came from the root bypass rather than an
    /// explicit grant; lets audit consumers tell "superuser override"
    /// from a normal rule match
    #[serde(default)]
    pub root_bypass: bool,
}

/// The engine's output: allow/deny plus a classified reason.
/// "Not authorized" is never an error value — it is this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub allowed: bool,
    pub code: DecisionCode,
    pub reason: String,
    #[serde(default)]
    pub details: DecisionDetails,
}

impl Decision {
    /// Allow via explicit grant match
    pub fn allow(key: PermissionKey, scope: Scope) -> Self {
        Self {
            allowed: true,
            code: DecisionCode::Ok,
            reason: "granted".to_string(),
            details: DecisionDetails {
                required_permission: Some(key),
                required_scope: Some(scope),
                ..Default::default()
            },
        }
    }

    /// Allow via the root bypass
    pub fn allow_root() -> Self {
        Self {
            allowed: true,
            code: DecisionCode::Ok,
            reason: "root bypass".to_string(),
            details: DecisionDetails {
                root_bypass: true,
                ..Default::default()
            },
        }
    }

    /// Allow without a backing grant (context checks, hierarchy checks)
    pub fn allow_plain(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            code: DecisionCode::Ok,
            reason: reason.into(),
            details: DecisionDetails::default(),
        }
    }

    pub fn deny(code: DecisionCode, reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            code,
            reason: reason.into(),
            details: DecisionDetails::default(),
        }
    }

    pub fn with_details(mut self, details: DecisionDetails) -> Self {
        self.details = details;
        self
    }

    /// Route-guard mapping: a deny becomes a Forbidden fault carrying
    /// the code and reason, an allow passes through.
    pub fn into_result(self) -> Result<Decision, AppError> {
        if self.allowed {
            Ok(self)
        } else {
            Err(AppError::Forbidden(format!(
                "{}: {}",
                self.code.as_str(),
                self.reason
            )))
        }
    }
}
