//! Provider credential resolution for tally-sync
//!
//! Multi-tier resolution with Database → ENV → TOML priority.

use sqlx::SqlitePool;
use tally_common::config::TomlConfig;
use tally_common::{Error, Result};
use tracing::{info, warn};

const ENV_CLIENT_ID: &str = "TALLY_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "TALLY_CLIENT_SECRET";

/// Resolved provider credentials
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Resolve provider credentials from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_provider_credentials(
    db: &SqlitePool,
    toml_config: &TomlConfig,
) -> Result<ProviderCredentials> {
    let db_id = crate::db::settings::get_client_id(db)
        .await
        .map_err(|e| Error::Internal(e.to_string()))?;
    let db_secret = crate::db::settings::get_client_secret(db)
        .await
        .map_err(|e| Error::Internal(e.to_string()))?;

    let env_id = std::env::var(ENV_CLIENT_ID).ok();
    let env_secret = std::env::var(ENV_CLIENT_SECRET).ok();

    let mut sources = Vec::new();
    if pair_valid(&db_id, &db_secret) {
        sources.push("database");
    }
    if pair_valid(&env_id, &env_secret) {
        sources.push("environment");
    }
    if pair_valid(&toml_config.client_id, &toml_config.client_secret) {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Provider credentials found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    // Resolution priority
    if pair_valid(&db_id, &db_secret) {
        info!("Provider credentials loaded from database");
        return Ok(ProviderCredentials {
            client_id: db_id.unwrap_or_default(),
            client_secret: db_secret.unwrap_or_default(),
        });
    }

    if pair_valid(&env_id, &env_secret) {
        info!("Provider credentials loaded from environment variables");
        return Ok(ProviderCredentials {
            client_id: env_id.unwrap_or_default(),
            client_secret: env_secret.unwrap_or_default(),
        });
    }

    if pair_valid(&toml_config.client_id, &toml_config.client_secret) {
        info!("Provider credentials loaded from TOML config");
        return Ok(ProviderCredentials {
            client_id: toml_config.client_id.clone().unwrap_or_default(),
            client_secret: toml_config.client_secret.clone().unwrap_or_default(),
        });
    }

    Err(Error::Config(
        "Provider credentials not configured. Please configure using one of:\n\
         1. Settings table: provider_client_id / provider_client_secret\n\
         2. Environment: TALLY_CLIENT_ID / TALLY_CLIENT_SECRET\n\
         3. TOML config: ~/.config/tally/config.toml (client_id / client_secret)"
            .to_string(),
    ))
}

/// Validate a credential value (non-empty, non-whitespace)
pub fn is_valid_credential(value: &str) -> bool {
    !value.trim().is_empty()
}

fn pair_valid(id: &Option<String>, secret: &Option<String>) -> bool {
    matches!(
        (id, secret),
        (Some(id), Some(secret)) if is_valid_credential(id) && is_valid_credential(secret)
    )
}
