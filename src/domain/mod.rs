//! Domain models for Eventra Authz

pub mod common;
pub mod context;
pub mod org;
pub mod permission;
pub mod role;
pub mod session;

pub use common::*;
pub use context::*;
pub use org::*;
pub use permission::*;
pub use role::*;
pub use session::*;
