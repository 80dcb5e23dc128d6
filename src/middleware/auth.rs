//! Session token extraction for HTTP handlers
//!
//! Verifies the Bearer session token and hands the minimal identity
//! token to handlers; the full `AuthContext` is built per request by
//! the context builder behind `AppState`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};

use crate::domain::IdentityToken;
use crate::server::AppState;

/// Verified minimal token extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub IdentityToken);

/// Authentication errors
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Invalid Authorization header format
    InvalidHeader(String),
    /// Token validation failed
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidHeader(_) => "Invalid authorization header",
            AuthError::InvalidToken => "Invalid token",
        };

        let body = serde_json::json!({
            "error": message,
            "code": "UNAUTHORIZED"
        });

        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Extract and validate Bearer token from Authorization header
fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("Invalid header encoding".to_string()))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AuthError::InvalidHeader(
            "Authorization header must use Bearer scheme".to_string(),
        ));
    }

    Ok(&auth_header[7..])
}

impl FromRequestParts<AppState> for AuthPrincipal {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        state
            .jwt_manager
            .verify_session(token)
            .map(AuthPrincipal)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DatabaseConfig, JwtConfig};
    use crate::jwt::JwtManager;
    use crate::policy::{AuthContextBuilder, AuthorizationService};
    use crate::repository::{
        GrantStoreImpl, MembershipStoreImpl, ModuleGateImpl, OrgStoreImpl, RoleStoreImpl,
    };
    use crate::server::build_router;
    use crate::service::SessionService;
    use axum::body::Body;
    use axum::http::{HeaderMap, HeaderValue, Request};
    use sqlx::mysql::MySqlPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            http_host: "127.0.0.1".to_string(),
            http_port: 0,
            database: DatabaseConfig {
                url: "mysql://localhost/eventra".to_string(),
                max_connections: 1,
                min_connections: 0,
            },
            jwt: JwtConfig {
                secret: "extractor-test-secret-0123456789abcdef".to_string(),
                issuer: "https://auth.eventra.test".to_string(),
                audience: "eventra".to_string(),
                session_ttl_secs: 3600,
                private_key_pem: None,
                public_key_pem: None,
            },
        }
    }

    /// State over a lazy pool: no connection is made unless a handler
    /// actually queries, which the routes under test never do.
    fn test_state() -> AppState {
        let config = test_config();
        let db_pool = MySqlPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();

        let membership = Arc::new(MembershipStoreImpl::new(db_pool.clone()));
        let roles = Arc::new(RoleStoreImpl::new(db_pool.clone()));
        let grants = Arc::new(GrantStoreImpl::new(db_pool.clone()));
        let orgs = Arc::new(OrgStoreImpl::new(db_pool.clone()));
        let jwt_manager = JwtManager::new(config.jwt.clone());
        let authz = Arc::new(AuthorizationService::new(
            membership.clone(),
            roles.clone(),
            grants.clone(),
        ));

        AppState {
            config: Arc::new(config),
            db_pool: db_pool.clone(),
            jwt_manager: jwt_manager.clone(),
            context_builder: Arc::new(AuthContextBuilder::new(roles.clone())),
            module_gate: Arc::new(ModuleGateImpl::new(db_pool)),
            authz: authz.clone(),
            session_service: Arc::new(SessionService::new(
                authz,
                membership,
                roles,
                orgs,
                jwt_manager,
            )),
        }
    }

    async fn whoami(AuthPrincipal(token): AuthPrincipal) -> String {
        token.subject_id.to_string()
    }

    fn test_router(state: AppState) -> axum::Router {
        axum::Router::new()
            .route("/whoami", axum::routing::get(whoami))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_extractor_rejects_missing_header() {
        let app = test_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_extractor_rejects_garbage_token() {
        let app = test_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_extractor_accepts_issued_session() {
        let state = test_state();
        let identity = crate::domain::StringUuid::new_v4();
        let (token, _) = state
            .jwt_manager
            .issue_session(identity, crate::domain::SessionMode::Tenant, None)
            .unwrap();
        let app = test_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], identity.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_health_route_responds_without_auth() {
        let app = build_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_token_missing() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::InvalidHeader(_))
        ));
    }
}
