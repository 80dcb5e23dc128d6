//! Permission keys, scopes and grants
//!
//! Permission keys are a closed, compile-time-checked table of
//! `(resource, action)` pairs rendered as `"<resource>.<action>"`.
//! Matching is exact equality: no wildcard or prefix matching exists,
//! every distinct action needs its own grant row.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resources guarded by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Event,
    Attendee,
    Registration,
    Badge,
    Invitation,
    Member,
    Role,
    Org,
    File,
    Email,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Event => "event",
            ResourceKind::Attendee => "attendee",
            ResourceKind::Registration => "registration",
            ResourceKind::Badge => "badge",
            ResourceKind::Invitation => "invitation",
            ResourceKind::Member => "member",
            ResourceKind::Role => "role",
            ResourceKind::Org => "org",
            ResourceKind::File => "file",
            ResourceKind::Email => "email",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "event" => ResourceKind::Event,
            "attendee" => ResourceKind::Attendee,
            "registration" => ResourceKind::Registration,
            "badge" => ResourceKind::Badge,
            "invitation" => ResourceKind::Invitation,
            "member" => ResourceKind::Member,
            "role" => ResourceKind::Role,
            "org" => ResourceKind::Org,
            "file" => ResourceKind::File,
            "email" => ResourceKind::Email,
            _ => return None,
        })
    }
}

/// Actions on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Read,
    Update,
    Delete,
    List,
    Assign,
    Send,
    Export,
    CheckIn,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Read => "read",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
            ActionKind::List => "list",
            ActionKind::Assign => "assign",
            ActionKind::Send => "send",
            ActionKind::Export => "export",
            ActionKind::CheckIn => "checkin",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "create" => ActionKind::Create,
            "read" => ActionKind::Read,
            "update" => ActionKind::Update,
            "delete" => ActionKind::Delete,
            "list" => ActionKind::List,
            "assign" => ActionKind::Assign,
            "send" => ActionKind::Send,
            "export" => ActionKind::Export,
            "checkin" => ActionKind::CheckIn,
            _ => return None,
        })
    }
}

/// Error raised when a stored permission string does not map onto the
/// closed table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown permission key: {0}")]
pub struct ParsePermissionKeyError(pub String);

/// A `(resource, action)` pair, e.g. `event.update`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionKey {
    pub resource: ResourceKind,
    pub action: ActionKind,
}

impl PermissionKey {
    pub const fn new(resource: ResourceKind, action: ActionKind) -> Self {
        Self { resource, action }
    }
}

impl std::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource.as_str(), self.action.as_str())
    }
}

impl std::str::FromStr for PermissionKey {
    type Err = ParsePermissionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, action) = s
            .split_once('.')
            .ok_or_else(|| ParsePermissionKeyError(s.to_string()))?;
        match (ResourceKind::parse(resource), ActionKind::parse(action)) {
            (Some(resource), Some(action)) => Ok(Self { resource, action }),
            _ => Err(ParsePermissionKeyError(s.to_string())),
        }
    }
}

impl TryFrom<String> for PermissionKey {
    type Error = ParsePermissionKeyError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PermissionKey> for String {
    fn from(key: PermissionKey) -> Self {
        key.to_string()
    }
}

/// Breadth of a grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Self only: the caller must own the resource
    Own,
    /// Whole current organization
    Org,
    /// Explicit allow-list on the resource
    Assigned,
    /// Unconditional
    Any,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Own => "own",
            Scope::Org => "org",
            Scope::Assigned => "assigned",
            Scope::Any => "any",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "own" => Scope::Own,
            "org" => Scope::Org,
            "assigned" => Scope::Assigned,
            "any" => Scope::Any,
            _ => return None,
        })
    }
}

/// A (permission key, scope) pair bundled into a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub key: PermissionKey,
    pub scope: Scope,
}

impl Grant {
    pub const fn new(key: PermissionKey, scope: Scope) -> Self {
        Self { key, scope }
    }
}
