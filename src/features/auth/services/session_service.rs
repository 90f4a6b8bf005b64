use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::Cookie;

use crate::core::config::SessionConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, SessionClaims};
use crate::shared::constants::SESSION_COOKIE_NAME;

/// Issues and validates HS256 session tokens and builds the cookie that carries them
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    cookie_secure: bool,
}

impl SessionService {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: config.ttl,
            cookie_secure: config.cookie_secure,
        }
    }

    /// Sign a session token for the user
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
    }

    /// Verify signature and expiry and recover the user
    pub fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Rejected session token: {}", e);
                AppError::Unauthorized("Invalid or expired session".to_string())
            })?
            .claims;

        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid or expired session".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            name: claims.name,
            email: claims.email,
        })
    }

    /// HTTP-only cookie holding the session token
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .build()
    }

    /// Cookie matching the session cookie's name and path, for removal
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> SessionService {
        SessionService::new(&SessionConfig {
            secret: secret.to_string(),
            ttl: Duration::from_secs(3600),
            cookie_secure: false,
        })
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 42,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let sessions = service("secret");
        let token = sessions.issue(&user()).unwrap();
        assert_eq!(sessions.validate(&token).unwrap(), user());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service("secret").issue(&user()).unwrap();
        let err = service("other").validate(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let sessions = service("secret");
        let past = Utc::now().timestamp() - 7200;
        let claims = SessionClaims {
            sub: "42".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            iat: past,
            exp: past + 60,
        };
        let token = encode(&Header::default(), &claims, &sessions.encoding_key).unwrap();

        assert!(matches!(
            sessions.validate(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(service("secret").validate("not-a-token").is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = service("secret").session_cookie("tok".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), None);
    }
}
