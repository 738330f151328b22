//! Application context for the Vista CLI.
//!
//! Bundles the parsed arguments with the lazily loaded config file.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use vista_core::storage::FileSlotStore;

use crate::cli::Cli;
use crate::config::VistaConfig;
use crate::constants::DEFAULT_DATE_FORMAT;
use crate::errors::CliError;

use super::{load_config, missing_vault_message, open_vault_with_retry, resolve_vault_dir, OpenVault};

/// Application context shared by every command handler.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<VistaConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the config file contents, loading them on first use.
    pub fn config(&self) -> anyhow::Result<&VistaConfig> {
        self.config.get_or_try_init(load_config)
    }

    pub fn vault_dir(&self) -> anyhow::Result<PathBuf> {
        resolve_vault_dir(self.cli.vault.as_deref(), self.config()?)
    }

    pub fn date_format(&self) -> anyhow::Result<&str> {
        Ok(self
            .config()?
            .ui
            .date_format
            .as_deref()
            .unwrap_or(DEFAULT_DATE_FORMAT))
    }

    pub fn backup_dir(&self) -> anyhow::Result<Option<PathBuf>> {
        Ok(self.config()?.backup.directory.as_ref().map(PathBuf::from))
    }

    /// Open the slot directory without unlocking (export, import, status).
    pub fn open_store(&self) -> anyhow::Result<FileSlotStore> {
        Ok(FileSlotStore::open(self.vault_dir()?)?)
    }

    /// Open the slot directory only if it already exists.
    pub fn open_existing_store(&self) -> anyhow::Result<FileSlotStore> {
        let dir = self.vault_dir()?;
        if !dir.is_dir() {
            return Err(CliError::not_found(
                missing_vault_message(&dir),
                "Hint: Run `vista add` to create a vault first.",
            )
            .into());
        }
        Ok(FileSlotStore::open(dir)?)
    }

    /// Open and unlock the vault, prompting for the password as needed.
    pub fn unlock(&self) -> anyhow::Result<OpenVault> {
        open_vault_with_retry(self.open_store()?, self.quiet())
    }
}
