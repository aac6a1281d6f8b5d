//! Signed tokens: admin sessions and the shared signing key
//!
//! Sessions are stateless HS256 JWTs. Verification never fails loudly:
//! callers get `None` and answer 401/403 themselves.

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use shared::models::AdminUser;
use thiserror::Error;

/// Issuer stamped on every token this service signs
pub const TOKEN_ISSUER: &str = "venue-cloud";

/// `type` claim of admin session tokens
pub const ADMIN_SESSION_TYPE: &str = "admin_session";

/// Cookie carrying the admin session token
pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unexpected token type: {0}")]
    WrongType(String),

    #[error("token generation failed: {0}")]
    Generation(String),
}

/// Signing and verification keys derived from `SESSION_SECRET`
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, session_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl,
        }
    }

    pub(crate) fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub(crate) fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);
        validation.validate_aud = false;
        validation.leeway = 5;

        jsonwebtoken::decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })
    }

    /// Issue a session token for a verified platform admin
    pub fn issue_session(&self, admin: &AdminSession) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AdminSessionClaims {
            sub: admin.user_id.clone(),
            email: admin.email.clone(),
            name: admin.name.clone(),
            token_type: ADMIN_SESSION_TYPE.to_string(),
            iat: now,
            exp: now + self.session_ttl.as_secs() as i64,
            iss: TOKEN_ISSUER.to_string(),
        };
        self.sign(&claims)
    }

    /// Verify a session token; any failure yields `None`
    pub fn verify_session(&self, token: &str) -> Option<AdminSession> {
        match self.decode_session(token) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!(reason = %e, "Admin session rejected");
                None
            }
        }
    }

    fn decode_session(&self, token: &str) -> Result<AdminSession, TokenError> {
        let claims: AdminSessionClaims = self.decode(token)?;
        if claims.token_type != ADMIN_SESSION_TYPE {
            return Err(TokenError::WrongType(claims.token_type));
        }
        Ok(AdminSession {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

/// JWT claims for admin sessions
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminSessionClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Issued at (Unix timestamp seconds)
    pub iat: i64,
    /// Expiration (Unix timestamp seconds)
    pub exp: i64,
    pub iss: String,
}

/// Authenticated platform admin, extracted from a verified session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl From<AdminSession> for AdminUser {
    fn from(session: AdminSession) -> Self {
        Self {
            id: session.user_id,
            email: session.email,
            name: session.name,
        }
    }
}

/// Pull the session token from `Authorization: Bearer` or the session cookie
pub fn token_from_headers(headers: &http::HeaderMap) -> Option<&str> {
    if let Some(token) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(token.trim());
    }

    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying a freshly issued session
pub fn session_cookie(token: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", Duration::ZERO, secure)
}
