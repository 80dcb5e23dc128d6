//! Per-org feature gating (engine extension point)
//!
//! The decision engine never consults this port; callers that wrap the
//! engine check it before evaluating a permission and surface the
//! `MODULE_DISABLED` deny code on failure.

use crate::domain::{Decision, DecisionCode, StringUuid};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModuleGate: Send + Sync {
    async fn is_module_enabled(&self, org_id: StringUuid, module_key: &str) -> Result<bool>;
}

/// Deny produced when a caller finds the target module switched off
pub fn module_disabled(module_key: &str) -> Decision {
    Decision::deny(
        DecisionCode::ModuleDisabled,
        format!("module '{}' is not enabled for this organization", module_key),
    )
}

pub struct ModuleGateImpl {
    pool: MySqlPool,
}

impl ModuleGateImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModuleGate for ModuleGateImpl {
    async fn is_module_enabled(&self, org_id: StringUuid, module_key: &str) -> Result<bool> {
        let row: Option<(bool,)> = sqlx::query_as(
            "SELECT enabled FROM org_modules WHERE org_id = ? AND module_key = ?",
        )
        .bind(org_id)
        .bind(module_key)
        .fetch_optional(&self.pool)
        .await?;

        // Absent row means the module was never provisioned
        Ok(row.map(|(enabled,)| enabled).unwrap_or(false))
    }
}
