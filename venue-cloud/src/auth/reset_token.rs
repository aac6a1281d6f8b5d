//! Password reset tokens
//!
//! Signed with the session key; distinguished from sessions by the `type`
//! claim. Each token carries a `jti` so the password update can record it
//! as consumed and refuse replays.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::session::{TOKEN_ISSUER, TokenError, TokenSigner};

/// `type` claim of password reset tokens
pub const PASSWORD_RESET_TYPE: &str = "password_reset";

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Unique token id, recorded on use
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// A verified, not-yet-consumed reset request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetGrant {
    pub user_id: String,
    pub email: String,
    pub jti: String,
}

impl TokenSigner {
    pub fn issue_reset_token(
        &self,
        user_id: &str,
        email: &str,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let claims = ResetClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            token_type: PASSWORD_RESET_TYPE.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            iss: TOKEN_ISSUER.to_string(),
        };
        self.sign(&claims)
    }

    /// Verify a reset token. Bad signature, expiry, malformed claims and a
    /// wrong `type` all collapse into `None`.
    pub fn verify_reset_token(&self, token: &str) -> Option<ResetGrant> {
        let result = self.decode::<ResetClaims>(token).and_then(|claims| {
            if claims.token_type != PASSWORD_RESET_TYPE {
                return Err(TokenError::WrongType(claims.token_type));
            }
            Ok(ResetGrant {
                user_id: claims.sub,
                email: claims.email,
                jti: claims.jti,
            })
        });

        match result {
            Ok(grant) => Some(grant),
            Err(e) => {
                tracing::debug!(reason = %e, "Password reset token rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::AdminSession;

    fn signer() -> TokenSigner {
        TokenSigner::new(
            "test-secret-that-is-at-least-32-bytes-long",
            Duration::from_secs(3600),
        )
    }

    fn claims(token_type: &str, exp_offset: i64) -> ResetClaims {
        let now = chrono::Utc::now().timestamp();
        ResetClaims {
            sub: "user-1".into(),
            email: "owner@example.com".into(),
            token_type: token_type.into(),
            jti: "jti-1".into(),
            iat: now,
            exp: now + exp_offset,
            iss: TOKEN_ISSUER.into(),
        }
    }

    #[test]
    fn test_reset_token_round_trip() {
        let signer = signer();
        let token = signer
            .issue_reset_token("user-1", "owner@example.com", Duration::from_secs(600))
            .unwrap();
        let grant = signer.verify_reset_token(&token).unwrap();
        assert_eq!(grant.user_id, "user-1");
        assert_eq!(grant.email, "owner@example.com");
        assert!(!grant.jti.is_empty());
    }

    #[test]
    fn test_each_token_gets_a_unique_jti() {
        let signer = signer();
        let ttl = Duration::from_secs(600);
        let a = signer.issue_reset_token("u", "e@x.com", ttl).unwrap();
        let b = signer.issue_reset_token("u", "e@x.com", ttl).unwrap();
        assert_ne!(
            signer.verify_reset_token(&a).unwrap().jti,
            signer.verify_reset_token(&b).unwrap().jti
        );
    }

    #[test]
    fn test_validly_signed_token_with_other_type_is_rejected() {
        let signer = signer();
        for token_type in ["admin_session", "email_verification", "", "PASSWORD_RESET"] {
            let token = signer.sign(&claims(token_type, 600)).unwrap();
            assert_eq!(signer.verify_reset_token(&token), None, "{token_type}");
        }
    }

    #[test]
    fn test_session_token_is_not_a_reset_token() {
        let signer = signer();
        let session = signer
            .issue_session(&AdminSession {
                user_id: "user-1".into(),
                email: "owner@example.com".into(),
                name: "Owner".into(),
            })
            .unwrap();
        assert_eq!(signer.verify_reset_token(&session), None);
    }

    #[test]
    fn test_expired_reset_token_is_rejected() {
        let signer = signer();
        let token = signer.sign(&claims(PASSWORD_RESET_TYPE, -3600)).unwrap();
        assert_eq!(signer.verify_reset_token(&token), None);
    }

    #[test]
    fn test_reset_token_from_other_key_is_rejected() {
        let other = TokenSigner::new(
            "another-secret-that-is-at-least-32-bytes",
            Duration::from_secs(3600),
        );
        let token = other.sign(&claims(PASSWORD_RESET_TYPE, 600)).unwrap();
        assert_eq!(signer().verify_reset_token(&token), None);
    }
}
