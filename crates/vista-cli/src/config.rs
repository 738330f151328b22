use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Contents of `config.toml`. Every section is optional.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VistaConfig {
    #[serde(default)]
    pub vault: VaultSection,
    #[serde(default)]
    pub backup: BackupSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSection {
    /// Directory holding the slot files
    pub path: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSection {
    /// Where `vista export` writes when no file is given
    pub directory: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSection {
    /// strftime pattern for dates in listings
    pub date_format: Option<String>,
}

/// Reject strftime patterns chrono cannot render.
pub fn validate_date_format(pattern: &str) -> anyhow::Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(anyhow::anyhow!(
            "Invalid [ui] date_format {:?} in config",
            pattern
        ));
    }
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_vault_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?)
}

pub fn read_config(path: &Path) -> anyhow::Result<VistaConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    let config: VistaConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))?;
    if let Some(pattern) = config.ui.date_format.as_deref() {
        validate_date_format(pattern)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))?;
    }
    Ok(config)
}

pub fn write_config(path: &Path, config: &VistaConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vista"));
        }
    }
    Ok(home_dir()?.join(".config").join("vista"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vista"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("vista"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_read_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = VistaConfig {
            vault: VaultSection {
                path: Some("/data/vista".to_string()),
            },
            backup: BackupSection {
                directory: Some("/backups".to_string()),
            },
            ui: UiSection {
                date_format: Some("%d %b %Y".to_string()),
            },
        };

        write_config(&path, &config).unwrap();
        assert_eq!(read_config(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_sections_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\ndate_format = \"%Y\"\n").unwrap();

        let config = read_config(&path).unwrap();
        assert_eq!(config.vault.path, None);
        assert_eq!(config.backup.directory, None);
        assert_eq!(config.ui.date_format.as_deref(), Some("%Y"));
    }

    #[test]
    fn test_invalid_toml_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[vault\npath = 1").unwrap();

        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_unknown_date_specifier_rejected() {
        assert!(validate_date_format("%d %b %Y").is_ok());
        assert!(validate_date_format("%Y-%Q").is_err());

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\ndate_format = \"%Y-%Q\"\n").unwrap();

        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("date_format"));
        assert!(err.to_string().contains("config.toml"));
    }
}
