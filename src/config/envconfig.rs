use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Names the optional config file layered under the environment. Kept outside
/// the `APP_` namespace so it never lands in the config tree.
pub const CONFIG_FILE_VAR: &str = "SHOP_ACCOUNTS_CONFIG";

/// Config tree assembled from an optional file plus `APP_`-prefixed variables,
/// `__` separating nested keys (`APP_AUTH__ACCESS_SECRET` -> `auth.access_secret`).
/// Environment values win over the file.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn load_dotenv() {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        if let Err(err) =
            dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv())
        {
            tracing::debug!("no .env file loaded: {err}");
        }
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn sources(
        file: Option<&str>,
    ) -> config_rs::ConfigBuilder<config_rs::builder::DefaultState> {
        let mut builder = config_rs::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config_rs::File::with_name(path).required(true));
        }
        builder.add_source(
            config_rs::Environment::with_prefix(Self::PREFIX)
                .prefix_separator("_")
                .separator(Self::SEPARATOR)
                .try_parsing(true),
        )
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();

        let file = std::env::var(CONFIG_FILE_VAR).ok();
        let settings = Self::sources(file.as_deref())
            .build()
            .with_context(|| match file.as_deref() {
                Some(path) => format!("failed to read config from {path} and environment"),
                None => "failed to read environment variables for config".to_string(),
            })?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize environment into config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
