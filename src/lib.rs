//! Eventra Authz - Authorization Decision Engine
//!
//! This crate provides the authorization core for the Eventra platform:
//! the permission decision engine, org-scoped session flows, and the
//! REST surface other services call to answer "may this identity do
//! this action on this resource".

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
