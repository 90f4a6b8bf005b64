use std::sync::Arc;
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthUserDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::password::{hash_password, verify_password};
use crate::features::auth::services::session_service::SessionService;
use crate::features::users::UserService;

/// A successful login: who logged in and the session token to hand back
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: AuthUserDto,
    pub token: String,
}

/// Service for authentication operations (register, login)
pub struct AuthService {
    users: Arc<UserService>,
    sessions: Arc<SessionService>,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, sessions: Arc<SessionService>) -> Self {
        Self { users, sessions }
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    /// Register a new user
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<()> {
        let account = dto.into_new_account()?;

        if self.users.find_by_email(&account.email).await?.is_some() {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        let password_hash = hash_password(account.password).await?;

        // The unique index still guards against a concurrent registration
        self.users
            .create(&account.name, &account.email, &password_hash)
            .await?;

        Ok(())
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginOutcome> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let (Some(email), Some(password)) = (dto.email, dto.password) else {
            return Err(invalid());
        };

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!("Login attempt for unknown email");
                return Err(invalid());
            }
        };

        if !verify_password(password, user.password.clone()).await? {
            debug!("Login attempt with wrong password: user_id={}", user.id);
            return Err(invalid());
        }

        let authenticated = AuthenticatedUser::from(&user);
        let token = self.sessions.issue(&authenticated)?;

        info!("User logged in: id={}", user.id);

        Ok(LoginOutcome {
            user: authenticated.into(),
            token,
        })
    }
}
