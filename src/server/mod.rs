//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::policy::{AuthContextBuilder, AuthorizationService};
use crate::repository::{
    GrantStoreImpl, MembershipStoreImpl, ModuleGateImpl, OrgStoreImpl, RoleStoreImpl,
};
use crate::service::SessionService;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub jwt_manager: JwtManager,
    pub context_builder: Arc<AuthContextBuilder<RoleStoreImpl>>,
    pub module_gate: Arc<ModuleGateImpl>,
    pub authz: Arc<AuthorizationService<MembershipStoreImpl, RoleStoreImpl, GrantStoreImpl>>,
    pub session_service: Arc<
        SessionService<MembershipStoreImpl, RoleStoreImpl, GrantStoreImpl, OrgStoreImpl>,
    >,
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready))
        // Session endpoints
        .route("/session/switch-org", post(api::session::switch_org))
        .route("/session/organizations", get(api::session::available_orgs))
        // Introspection
        .route("/authz/introspect", get(api::introspect::introspect))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(config: Config) -> Result<()> {
    // Create database connection pool
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    // Create stores
    let membership_store = Arc::new(MembershipStoreImpl::new(db_pool.clone()));
    let role_store = Arc::new(RoleStoreImpl::new(db_pool.clone()));
    let grant_store = Arc::new(GrantStoreImpl::new(db_pool.clone()));
    let org_store = Arc::new(OrgStoreImpl::new(db_pool.clone()));
    let module_gate = Arc::new(ModuleGateImpl::new(db_pool.clone()));

    // Create JWT manager
    let jwt_manager = JwtManager::new(config.jwt.clone());

    // Create the decision engine and session flow
    let context_builder = Arc::new(AuthContextBuilder::new(role_store.clone()));
    let authz = Arc::new(AuthorizationService::new(
        membership_store.clone(),
        role_store.clone(),
        grant_store.clone(),
    ));
    let session_service = Arc::new(SessionService::new(
        authz.clone(),
        membership_store.clone(),
        role_store.clone(),
        org_store.clone(),
        jwt_manager.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        jwt_manager,
        context_builder,
        module_gate,
        authz,
        session_service,
    };

    let app = build_router(state);

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
