mod context;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use secrecy::SecretString;

use vista_core::storage::FileSlotStore;
use vista_core::{Dataset, Vault, VistaError};

use crate::config::{default_config_path, default_vault_dir, read_config, write_config, VistaConfig};
use crate::constants::{env_vars, MAX_PASSWORD_ATTEMPTS};
use crate::errors::CliError;
use crate::helpers::{env_password, prompt_new_password, prompt_password};

pub use context::AppContext;

const FORGOTTEN_PASSWORD_HINT: &str =
    "Hint: There is no password recovery. Backups open with the password that was set when they were exported.";

/// An unlocked vault together with its decrypted contents.
pub struct OpenVault {
    pub vault: Vault<FileSlotStore>,
    pub dataset: Dataset,
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env_vars::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file; a missing file is an empty config.
pub fn load_config() -> anyhow::Result<VistaConfig> {
    let path = resolve_config_path()?;
    if !path.exists() {
        return Ok(VistaConfig::default());
    }
    read_config(&path)
}

/// `--vault` / VISTA_VAULT, then the config file, then the XDG data directory.
pub fn resolve_vault_dir(flag: Option<&str>, config: &VistaConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag.filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.vault.path.as_deref() {
        return Ok(PathBuf::from(path));
    }
    default_vault_dir()
}

/// Unlock `store`, creating a vault on first run.
///
/// Interactive sessions get up to three password attempts; a password from
/// VISTA_PASSPHRASE or a non-interactive session gets one.
pub fn open_vault_with_retry(store: FileSlotStore, quiet: bool) -> anyhow::Result<OpenVault> {
    let root = store.root().to_path_buf();
    let mut vault = Vault::new(store);
    let interactive = std::io::stdin().is_terminal();

    if !vault.has_stored_data()? {
        let password = match env_password() {
            Some(password) => password,
            None => prompt_new_password("Create a password", interactive)?,
        };
        let dataset = vault.unlock(&password)?;
        if !quiet {
            eprintln!("Created a new vault at {}", root.display());
        }
        remember_vault_dir(&root);
        return Ok(OpenVault { vault, dataset });
    }

    let env = env_password();
    let max_attempts = if interactive && env.is_none() {
        MAX_PASSWORD_ATTEMPTS
    } else {
        1
    };
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let outcome = match env.as_ref() {
            Some(password) => vault.unlock(password),
            None => {
                let password: SecretString = prompt_password(interactive)?;
                vault.unlock(&password)
            }
        };

        match outcome {
            Ok(dataset) => return Ok(OpenVault { vault, dataset }),
            Err(VistaError::Decryption) => {
                let remaining = max_attempts.saturating_sub(attempts);
                if remaining == 0 {
                    let message = if max_attempts > 1 {
                        "Too many failed password attempts.".to_string()
                    } else {
                        VistaError::Decryption.to_string()
                    };
                    return Err(CliError::auth_failed_with_hint(message, FORGOTTEN_PASSWORD_HINT).into());
                }
                eprintln!(
                    "{}. {} attempt{} remaining.",
                    VistaError::Decryption,
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Record a newly created vault directory in the config file if there is none yet.
fn remember_vault_dir(root: &Path) {
    let result = resolve_config_path().and_then(|path| {
        if path.exists() {
            return Ok(());
        }
        let mut config = VistaConfig::default();
        config.vault.path = Some(root.to_string_lossy().to_string());
        write_config(&path, &config)
    });
    if let Err(err) = result {
        tracing::warn!(error = %err, "could not record vault location in config");
    }
}

pub fn missing_vault_message(dir: &Path) -> String {
    format!("No vault found at {}", dir.display())
}
