use crate::config::Config;
use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::Role;
use crate::repository::UserRepository;
use crate::service::auth_service;

/// Seeds the admin account on first boot, once the users table exists and is
/// empty. Credentials come from configuration; only the hash is stored.
pub async fn ensure_admin_user(user_repo: &UserRepository, config: &Config) -> Result<(), AppError> {
    if user_repo.count().await? > 0 {
        return Ok(());
    }

    let password_hash = auth_service::hash_password(&config.admin_password).await?;
    user_repo
        .insert(&config.admin_username, &password_hash, Role::Admin)
        .await?;
    tracing::info!("{} Admin user {} initialized", API_NAME, config.admin_username);
    Ok(())
}
