//! Session API handlers: org switching and the available-orgs listing

use crate::api::SuccessResponse;
use crate::domain::StringUuid;
use crate::error::Result;
use crate::middleware::AuthPrincipal;
use crate::server::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SwitchOrgRequest {
    pub org_id: Uuid,
}

/// Re-bind the caller's session to a different organization
pub async fn switch_org(
    State(state): State<AppState>,
    AuthPrincipal(token): AuthPrincipal,
    Json(request): Json<SwitchOrgRequest>,
) -> Result<impl IntoResponse> {
    let ctx = state.context_builder.build(&token).await?;
    let session = state
        .session_service
        .switch_org(&ctx, StringUuid::from(request.org_id))
        .await?;
    Ok(Json(SuccessResponse::new(session)))
}

/// List every organization the caller can bind to
pub async fn available_orgs(
    State(state): State<AppState>,
    AuthPrincipal(token): AuthPrincipal,
) -> Result<impl IntoResponse> {
    let ctx = state.context_builder.build(&token).await?;
    let orgs = state.session_service.available_orgs(&ctx).await?;
    Ok(Json(SuccessResponse::new(orgs)))
}
