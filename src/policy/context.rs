//! Auth context construction
//!
//! Expands a minimal, already-verified identity token into the full
//! evaluation context consumed by the engine. Built once per request.

use crate::domain::{AuthContext, IdentityToken, SessionMode};
use crate::error::Result;
use crate::repository::RoleStore;
use std::sync::Arc;

pub struct AuthContextBuilder<R: RoleStore> {
    roles: Arc<R>,
}

impl<R: RoleStore> AuthContextBuilder<R> {
    pub fn new(roles: Arc<R>) -> Self {
        Self { roles }
    }

    /// Build the evaluation context for a verified token.
    ///
    /// A platform token whose role has since been revoked degrades to
    /// the least-privileged platform context (no root, and the resolver
    /// will find no grants) instead of erroring; absence of privilege
    /// is not a fault.
    pub async fn build(&self, token: &IdentityToken) -> Result<AuthContext> {
        match token.mode {
            SessionMode::Platform => {
                let role = self.roles.get_platform_role(token.subject_id).await?;
                if role.is_none() {
                    tracing::warn!(
                        identity = %token.subject_id,
                        "platform token without a platform role; building degraded context"
                    );
                }
                Ok(AuthContext {
                    identity_id: token.subject_id,
                    mode: SessionMode::Platform,
                    is_platform: true,
                    is_root: role.map(|r| r.is_root).unwrap_or(false),
                    // platform identities are never org-bound
                    current_org_id: None,
                })
            }
            SessionMode::Tenant => Ok(AuthContext {
                identity_id: token.subject_id,
                mode: SessionMode::Tenant,
                is_platform: false,
                is_root: false,
                // may legitimately be None: no org selected yet
                current_org_id: token.current_org_id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlatformRole, StringUuid};
    use crate::repository::role::MockRoleStore;

    fn token(mode: SessionMode, org: Option<StringUuid>) -> IdentityToken {
        IdentityToken {
            subject_id: StringUuid::new_v4(),
            mode,
            current_org_id: org,
        }
    }

    #[tokio::test]
    async fn test_platform_context_carries_root_flag() {
        let mut roles = MockRoleStore::new();
        roles.expect_get_platform_role().returning(|_| {
            Ok(Some(PlatformRole {
                is_root: true,
                ..Default::default()
            }))
        });

        let builder = AuthContextBuilder::new(Arc::new(roles));
        let ctx = builder
            .build(&token(SessionMode::Platform, Some(StringUuid::new_v4())))
            .await
            .unwrap();

        assert!(ctx.is_platform);
        assert!(ctx.is_root);
        // never org-bound, even if the token smuggled one in
        assert_eq!(ctx.current_org_id, None);
    }

    #[tokio::test]
    async fn test_platform_context_degrades_without_role() {
        let mut roles = MockRoleStore::new();
        roles.expect_get_platform_role().returning(|_| Ok(None));

        let builder = AuthContextBuilder::new(Arc::new(roles));
        let ctx = builder
            .build(&token(SessionMode::Platform, None))
            .await
            .unwrap();

        assert!(ctx.is_platform);
        assert!(!ctx.is_root);
    }

    #[tokio::test]
    async fn test_tenant_context_passes_org_through() {
        let roles = MockRoleStore::new();
        let builder = AuthContextBuilder::new(Arc::new(roles));

        let org = StringUuid::new_v4();
        let ctx = builder
            .build(&token(SessionMode::Tenant, Some(org)))
            .await
            .unwrap();

        assert!(!ctx.is_platform);
        assert!(!ctx.is_root);
        assert_eq!(ctx.current_org_id, Some(org));

        let unbound = builder.build(&token(SessionMode::Tenant, None)).await.unwrap();
        assert_eq!(unbound.current_org_id, None);
    }
}
