use std::sync::Arc;

use crate::{
    auth::{
        AuthProviderKind, Role,
        oauth::{AppleAdapter, GoogleAdapter, OAuthProviders},
        password::hash_password,
    },
    config::{AuthConfig, OAuthConfig},
    db::dao::{DaoContext, NewUser},
};

pub fn build_oauth_providers(cfg: &OAuthConfig) -> anyhow::Result<OAuthProviders> {
    let mut providers = OAuthProviders::new();

    if let Some(google) = cfg.google.clone() {
        providers.add(Arc::new(GoogleAdapter::new(google)?))?;
    }
    if let Some(apple) = cfg.apple.clone() {
        providers.add(Arc::new(AppleAdapter::new(apple)?))?;
    }

    let configured: Vec<&str> = [AuthProviderKind::Google, AuthProviderKind::Apple]
        .into_iter()
        .filter(|provider| providers.is_configured(*provider))
        .map(AuthProviderKind::as_str)
        .collect();
    tracing::info!(providers = ?configured, "oauth providers ready");

    Ok(providers)
}

/// Creates the configured admin account unless the email is already taken.
pub async fn seed_admin(cfg: &AuthConfig, daos: &DaoContext) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (cfg.admin_email.as_deref(), cfg.admin_password.as_deref())
    else {
        return Ok(());
    };

    let users = daos.user();
    if let Some(existing) = users.find_by_email(email).await? {
        tracing::info!("admin user already present: {}", existing.email);
        return Ok(());
    }

    let password_hash =
        hash_password(password).map_err(|err| anyhow::anyhow!("admin seed hash error: {err}"))?;
    let user = users
        .create_user(NewUser {
            email: email.to_string(),
            password_hash,
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            role: Role::Admin.as_str().to_string(),
            auth_provider: AuthProviderKind::Local.as_str().to_string(),
            auth_provider_id: None,
            avatar_url: None,
            is_verified: true,
        })
        .await?;
    tracing::info!("seeded admin user {}", user.email);
    Ok(())
}
