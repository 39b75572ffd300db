//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use quotebox_core::Config;

use crate::output::{Output, OutputFormat};

/// Keys accepted by `config set`
const VALID_KEYS: &str = "data_dir, sync_url, sync_enabled, sync_interval_secs, notice_secs, log_file";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "sync_url": config.sync_url,
                    "sync_enabled": config.sync_enabled,
                    "sync_interval_secs": config.sync_interval_secs,
                    "notice_secs": config.notice_secs,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:           {}", config.data_dir.display());
            println!(
                "  sync_url:           {}",
                config.sync_url.as_deref().unwrap_or("(not set)")
            );
            println!("  sync_enabled:       {}", config.sync_enabled);
            println!("  sync_interval_secs: {}", config.sync_interval_secs);
            println!("  notice_secs:        {}", config.notice_secs);
            println!(
                "  log_file:           {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one `key = value` change to `config`
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "sync_url" => {
            // A missing sync_url reads back as the default endpoint, so
            // clearing it also switches sync off
            if is_unset(value) {
                config.sync_url = None;
                config.sync_enabled = false;
            } else {
                config.sync_url = Some(value.to_string());
            }
        }
        "sync_enabled" => {
            config.sync_enabled = value
                .parse()
                .context("Invalid value for sync_enabled. Use 'true' or 'false'.")?;
        }
        "sync_interval_secs" => {
            config.sync_interval_secs = parse_secs(key, value)?;
        }
        "notice_secs" => {
            config.notice_secs = parse_secs(key, value)?;
        }
        "log_file" => {
            config.log_file = if is_unset(value) {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }
    Ok(())
}

fn is_unset(value: &str) -> bool {
    value.is_empty() || value == "none"
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}. Use a whole number of seconds.", key))?;
    if secs == 0 {
        bail!("{} must be greater than zero", key);
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sync_url_none_disables_sync() {
        let mut config = Config::default();
        apply(&mut config, "sync_url", "none").unwrap();

        assert!(config.sync_url.is_none());
        assert!(!config.sync_enabled);
        assert!(!config.sync_active());
    }

    #[test]
    fn test_apply_sync_interval() {
        let mut config = Config::default();
        apply(&mut config, "sync_interval_secs", "30").unwrap();
        assert_eq!(config.sync_interval_secs, 30);

        assert!(apply(&mut config, "sync_interval_secs", "0").is_err());
        assert!(apply(&mut config, "sync_interval_secs", "soon").is_err());
        assert_eq!(config.sync_interval_secs, 30);
    }

    #[test]
    fn test_apply_unknown_key() {
        let mut config = Config::default();
        let err = apply(&mut config, "favorite_quote", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_set_writes_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let data_dir = temp_dir.path().join("data");

        // Point data_dir at the temp dir first so loading never touches $HOME
        std::fs::write(
            &config_path,
            format!("data_dir = {:?}\n", data_dir.display().to_string()),
        )
        .unwrap();

        let output = Output::new(OutputFormat::Quiet);
        set(
            "notice_secs".to_string(),
            "8".to_string(),
            Some(&config_path),
            &output,
        )
        .unwrap();

        let saved = Config::load_from_path(&config_path).unwrap();
        assert_eq!(saved.notice_secs, 8);
        assert!(saved.data_dir.exists());
    }
}
