use serde::Serialize;
use std::sync::Arc;

use crate::auth::jwt::create_token;
use crate::auth::password::{
    hash_password, verify_against_dummy, verify_password, MIN_PASSWORD_LEN,
};
use crate::domain::errors::{CensusError, CensusResult};
use crate::domain::repositories::{AdminRepository, Administrator};

const MAX_USERNAME_LEN: usize = 50;
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Response from successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin_id: i32,
    pub username: String,
}

/// Administrator login and account management
pub struct AdminService {
    admins: Arc<dyn AdminRepository>,
    jwt_secret: Arc<str>,
}

impl AdminService {
    pub fn new(admins: Arc<dyn AdminRepository>, jwt_secret: Arc<str>) -> Self {
        Self { admins, jwt_secret }
    }

    /// Check credentials and issue a session token
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> CensusResult<LoginResponse> {
        let admin = self
            .admins
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| {
                verify_against_dummy(password);
                tracing::warn!(username, "Login attempt for unknown administrator");
                CensusError::Unauthorized(INVALID_CREDENTIALS.to_string())
            })?;

        let valid = verify_password(password, &admin.password_hash).map_err(|e| {
            CensusError::Internal(format!("Password verification failed: {}", e))
        })?;
        if !valid {
            tracing::warn!(username = %admin.username, "Login attempt with wrong password");
            return Err(CensusError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = create_token(admin.id, &admin.username, &self.jwt_secret)
            .map_err(|e| CensusError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(admin_id = admin.id, "Administrator logged in");
        Ok(LoginResponse {
            token,
            admin_id: admin.id,
            username: admin.username,
        })
    }

    /// Create a new administrator account
    pub async fn register(&self, username: &str, password: &str) -> CensusResult<Administrator> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CensusError::validation("Username is required"));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(CensusError::validation(format!(
                "Username cannot exceed {} characters",
                MAX_USERNAME_LEN
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CensusError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let password_hash = hash_password(password)
            .map_err(|e| CensusError::Internal(format!("Failed to hash password: {}", e)))?;

        let admin = self.admins.create(username, &password_hash).await?;
        tracing::info!(admin_id = admin.id, username = %admin.username, "Administrator created");
        Ok(admin)
    }

    /// Create the configured administrator unless it already exists
    ///
    /// Returns whether an account was created.
    pub async fn ensure_bootstrap_admin(&self, username: &str, password: &str) -> CensusResult<bool> {
        if self.admins.find_by_username(username.trim()).await?.is_some() {
            tracing::debug!(username, "Bootstrap administrator already present");
            return Ok(false);
        }
        self.register(username, password).await?;
        Ok(true)
    }
}
