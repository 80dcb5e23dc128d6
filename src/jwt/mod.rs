//! Session token handling
//!
//! Signature and expiry verification for session tokens ends here; the
//! decision engine trusts the resulting `IdentityToken` and never
//! re-verifies inside an evaluation.

use crate::config::JwtConfig;
use crate::domain::{IdentityToken, SessionMode, StringUuid};
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_TYPE_SESSION: &str = "session";

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (identity ID)
    pub sub: String,
    /// Identity mode: "tenant" or "platform"
    pub mode: String,
    /// Bound organization (tenant mode only, absent = no org selected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Token type discriminator (prevents token confusion attacks)
    #[serde(default)]
    pub token_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let algorithm = if config.private_key_pem.is_some() {
            Algorithm::RS256
        } else {
            Algorithm::HS256
        };
        let encoding_key = match config.private_key_pem.as_ref() {
            Some(private_key) => EncodingKey::from_rsa_pem(private_key.as_bytes())
                .expect("Failed to load JWT private key"),
            None => EncodingKey::from_secret(config.secret.as_bytes()),
        };
        let decoding_key = match config.public_key_pem.as_ref() {
            Some(public_key) => DecodingKey::from_rsa_pem(public_key.as_bytes())
                .expect("Failed to load JWT public key"),
            None => DecodingKey::from_secret(config.secret.as_bytes()),
        };
        Self {
            config,
            encoding_key,
            decoding_key,
            algorithm,
        }
    }

    /// Issue a session token for an identity in the given mode
    pub fn issue_session(
        &self,
        identity_id: StringUuid,
        mode: SessionMode,
        org_id: Option<StringUuid>,
    ) -> Result<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.config.session_ttl_secs);

        let claims = SessionClaims {
            sub: identity_id.to_string(),
            mode: mode.as_str().to_string(),
            org: org_id.map(|id| id.to_string()),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            token_type: TOKEN_TYPE_SESSION.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    /// Verify a session token and reduce it to the minimal identity
    /// token consumed by the context builder
    pub fn verify_session(&self, token: &str) -> Result<IdentityToken> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        let claims = data.claims;

        if claims.token_type != TOKEN_TYPE_SESSION {
            return Err(AppError::Unauthorized("Unexpected token type".to_string()));
        }

        let subject_id = StringUuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid subject in token".to_string()))?;
        let mode = SessionMode::parse(&claims.mode)
            .ok_or_else(|| AppError::Unauthorized("Invalid mode in token".to_string()))?;
        let current_org_id = match claims.org {
            Some(raw) => Some(
                StringUuid::parse_str(&raw)
                    .map_err(|_| AppError::Unauthorized("Invalid org in token".to_string()))?,
            ),
            None => None,
        };

        // Platform tokens are never org-bound
        let current_org_id = match mode {
            SessionMode::Platform => None,
            SessionMode::Tenant => current_org_id,
        };

        Ok(IdentityToken {
            subject_id,
            mode,
            current_org_id,
        })
    }
}
