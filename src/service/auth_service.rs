use std::sync::Arc;

use crate::auth::JwtService;
use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::{LoginRequest, LoginResponse};
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt: Arc<JwtService>) -> Self {
        Self { user_repo, jwt }
    }

    /// Verifies credentials and issues a token. A failed login produces a
    /// response with a message and no token; the handler maps that to 400.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AppError> {
        if let Some(user) = self.user_repo.find_by_username(&request.username).await? {
            if verify_password(&request.password, &user.password_hash).await? {
                let role = user.role();
                let token = self
                    .jwt
                    .issue(&user.username, role)
                    .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))?;
                tracing::info!("{} User {} logged in", API_NAME, user.username);
                return Ok(LoginResponse::success(token, user.username, role));
            }
        }

        tracing::warn!("{} Failed login attempt for user {}", API_NAME, request.username);
        Ok(LoginResponse::failure("Invalid username or password"))
    }

    pub fn is_valid_token(&self, token: &str) -> bool {
        self.jwt.validate(token)
    }

    /// Tokens are self-contained; logout needs no server-side action.
    pub fn logout(&self) {}
}

/// bcrypt is CPU-bound; both hashing and verification run on the blocking
/// thread pool.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Password hashing task failed: {}", e))?
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;
    Ok(hash)
}

async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))?
        .map_err(|e| anyhow::anyhow!("Password verification failed: {}", e))?;
    Ok(matches)
}
