//! Store ports consumed by the decision engine (Repository pattern)
//!
//! All reads go against externally owned data; this crate never writes
//! to any of these tables.

pub mod grant;
pub mod membership;
pub mod module_gate;
pub mod org;
pub mod role;

pub use grant::{GrantStore, GrantStoreImpl};
pub use membership::{MembershipStore, MembershipStoreImpl};
pub use module_gate::{ModuleGate, ModuleGateImpl};
pub use org::{OrgStore, OrgStoreImpl};
pub use role::{RoleStore, RoleStoreImpl};
