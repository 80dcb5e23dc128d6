//! Read-only introspection: the caller's own resolved role and grants

use crate::api::SuccessResponse;
use crate::domain::{AuthContext, Grant};
use crate::error::Result;
use crate::middleware::AuthPrincipal;
use crate::policy::ResolvedRole;
use crate::server::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IntrospectionResponse {
    pub context: AuthContext,
    pub role: Option<ResolvedRole>,
    pub grants: Vec<Grant>,
}

/// What the engine would see for the calling identity right now
pub async fn introspect(
    State(state): State<AppState>,
    AuthPrincipal(token): AuthPrincipal,
) -> Result<impl IntoResponse> {
    let ctx = state.context_builder.build(&token).await?;
    let resolved = state.authz.resolver().resolve(&ctx).await?;

    Ok(Json(SuccessResponse::new(IntrospectionResponse {
        context: ctx,
        role: resolved.role,
        grants: resolved.grants,
    })))
}
