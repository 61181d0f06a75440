//! Config commands
//!
//! Commands for managing the API URL and company credentials.

use anyhow::{bail, Result};
use clap::Subcommand;
use koli_core::{validate_api_url, ApiSettings, ApiSettingsUpdate, ClientConfig, DEFAULT_API_URL};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::mask;
use super::Context;

const KEYS: &str = "api_base_url, company_code, company_password";

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (api_base_url, company_code, company_password)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Remove the API URL and company credentials
    Reset,
}

/// Config row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

pub async fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(ctx).await,
        ConfigAction::Set { key, value } => set_config(ctx, key, value).await,
        ConfigAction::Get { key } => get_config(ctx, key).await,
        ConfigAction::Reset => reset_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    let rows = get_all_config(ctx).await;
    ctx.out.list(&rows)?;

    let settings = ctx.credentials.get().await;
    if !settings.has_base_url() {
        ctx.out.info(&format!(
            "API URL is not set. Suggested: koli config set api_base_url {}",
            DEFAULT_API_URL
        ));
    }
    Ok(())
}

async fn get_config(ctx: &Context, key: String) -> Result<()> {
    let rows = get_all_config(ctx).await;

    match rows.iter().find(|r| r.key.eq_ignore_ascii_case(&key)) {
        Some(row) if ctx.out.is_json() => ctx.out.single(row),
        Some(row) => {
            println!("{}", row.value);
            Ok(())
        }
        None => bail!("Config key not found: {}", key),
    }
}

async fn set_config(ctx: &Context, key: String, value: String) -> Result<()> {
    let update = match key.to_lowercase().as_str() {
        "api_base_url" => ApiSettingsUpdate::url(validate_api_url(&value)?),
        "company_code" => ApiSettingsUpdate::company_code(value.trim()),
        "company_password" => ApiSettingsUpdate::company_password(value.trim()),
        _ => bail!("Unknown config key: {}. Available keys: {}", key, KEYS),
    };

    let settings = ctx.credentials.set(update).await?;

    let message = match key.to_lowercase().as_str() {
        "api_base_url" => format!("Set api_base_url = {}", settings.api_base_url),
        "company_code" => format!("Set company_code = {}", settings.company_code),
        _ => "Set company_password = ****".to_string(),
    };
    ctx.out.success(&message);
    Ok(())
}

async fn reset_config(ctx: &Context) -> Result<()> {
    ctx.credentials.reset().await?;
    ctx.out.success("Configuration reset");
    Ok(())
}

async fn get_all_config(ctx: &Context) -> Vec<ConfigRow> {
    let settings = ctx.credentials.get().await;
    let mut rows = settings_rows(&settings);

    // Database path
    let db_path = ctx
        .db
        .path()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "in-memory".to_string());
    rows.push(ConfigRow {
        key: "KOLI_DB_PATH".to_string(),
        value: db_path,
        source: if std::env::var("KOLI_DB_PATH").is_ok() { "env" } else { "default" }.to_string(),
    });

    let client = ClientConfig::from_env();
    rows.push(ConfigRow {
        key: "license_key".to_string(),
        value: client.license_key,
        source: if std::env::var("KOLI_LICENSE_KEY").is_ok() { "env" } else { "default" }.to_string(),
    });

    rows
}

fn settings_rows(settings: &ApiSettings) -> Vec<ConfigRow> {
    let source = |value: &str| if value.is_empty() { "unset" } else { "db" }.to_string();

    vec![
        ConfigRow {
            key: "api_base_url".to_string(),
            value: settings.api_base_url.clone(),
            source: source(&settings.api_base_url),
        },
        ConfigRow {
            key: "company_code".to_string(),
            value: settings.company_code.clone(),
            source: source(&settings.company_code),
        },
        ConfigRow {
            key: "company_password".to_string(),
            value: mask(&settings.company_password),
            source: source(&settings.company_password),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_rows_mask_password() {
        let settings = ApiSettings {
            api_base_url: "https://erp.test/Services".to_string(),
            company_code: "C1".to_string(),
            company_password: "s3cret".to_string(),
        };
        let rows = settings_rows(&settings);

        assert_eq!(rows[0].value, "https://erp.test/Services");
        assert_eq!(rows[0].source, "db");
        assert_eq!(rows[2].value, "****");
        assert!(!serde_json::to_string(&rows).unwrap().contains("s3cret"));
    }

    #[test]
    fn test_settings_rows_unset() {
        let rows = settings_rows(&ApiSettings::default());
        assert!(rows.iter().all(|r| r.value.is_empty() && r.source == "unset"));
    }
}
