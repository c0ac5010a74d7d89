use anyhow::{Result, bail};

use super::AppConfig;

const MIN_ADMIN_PASSWORD_LEN: usize = 8;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    let auth = &cfg.auth;
    if auth.access_secret.trim().is_empty() {
        errors.push("auth.access_secret must not be empty".to_string());
    }
    if auth.refresh_secret.trim().is_empty() {
        errors.push("auth.refresh_secret must not be empty".to_string());
    }
    if !auth.access_secret.is_empty() && auth.access_secret == auth.refresh_secret {
        errors.push("auth.access_secret and auth.refresh_secret must differ".to_string());
    }
    if auth.access_ttl_secs == 0 {
        errors.push("auth.access_ttl_secs must be > 0".to_string());
    }
    if auth.refresh_ttl_secs <= auth.access_ttl_secs {
        errors.push("auth.refresh_ttl_secs must be greater than auth.access_ttl_secs".to_string());
    }
    if auth.reset_ttl_mins == 0 {
        errors.push("auth.reset_ttl_mins must be > 0".to_string());
    }
    if auth.purge_interval_secs == 0 {
        errors.push("auth.purge_interval_secs must be > 0".to_string());
    }

    match (auth.admin_email.as_deref(), auth.admin_password.as_deref()) {
        (Some(email), Some(password)) => {
            if email.trim().is_empty() {
                errors.push("auth.admin_email must not be empty".to_string());
            }
            if password.len() < MIN_ADMIN_PASSWORD_LEN {
                errors.push(format!(
                    "auth.admin_password must be at least {MIN_ADMIN_PASSWORD_LEN} characters"
                ));
            }
        }
        (None, None) => {}
        _ => errors.push(
            "auth.admin_email and auth.admin_password must be set together".to_string(),
        ),
    }

    if let Some(google) = cfg.oauth.google.as_ref() {
        if google.client_id.trim().is_empty() || google.client_secret.trim().is_empty() {
            errors.push("oauth.google.client_id and client_secret must not be empty".to_string());
        }
    }

    if let Some(apple) = cfg.oauth.apple.as_ref() {
        if apple.client_id.trim().is_empty() || apple.client_secret.trim().is_empty() {
            errors.push("oauth.apple.client_id and client_secret must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
