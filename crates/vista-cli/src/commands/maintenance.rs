//! Status, password change and shell completions.

use std::io::IsTerminal;

use clap::CommandFactory;
use clap_complete::generate;
use secrecy::SecretString;
use vista_core::storage::{Slot, SlotStore};

use crate::app::{missing_vault_message, AppContext};
use crate::cli::{Cli, CompletionsArgs};
use crate::constants::env_vars;
use crate::errors::CliError;
use crate::helpers::prompt_new_password;

pub fn handle_status(ctx: &AppContext) -> anyhow::Result<()> {
    let dir = ctx.vault_dir()?;
    if !dir.is_dir() {
        println!("{}", missing_vault_message(&dir));
        println!("Run `vista add` to create one.");
        return Ok(());
    }

    let store = ctx.open_store()?;
    println!("Vault: {}", dir.display());
    if !store.contains(Slot::Salt)? {
        println!("State: no password set yet");
        return Ok(());
    }
    println!("State: password set");
    for slot in Slot::ALL {
        let size = store.read(slot)?.map(|value| value.len());
        match size {
            Some(bytes) => println!("  {:<22} {} bytes", slot.key(), bytes),
            None => println!("  {:<22} (empty)", slot.key()),
        }
    }
    Ok(())
}

pub fn handle_passwd(ctx: &AppContext) -> anyhow::Result<()> {
    if !ctx.open_existing_store()?.contains(Slot::Salt)? {
        return Err(CliError::not_found(
            missing_vault_message(&ctx.vault_dir()?),
            "Hint: Run `vista add` to create a vault first.",
        )
        .into());
    }

    let mut open = ctx.unlock()?;
    let new_password = match std::env::var(env_vars::NEW_PASSPHRASE)
        .ok()
        .filter(|v| !v.trim().is_empty())
    {
        Some(value) => SecretString::from(value),
        None => prompt_new_password("New password", std::io::stdin().is_terminal())?,
    };
    open.vault.change_password(&new_password, &open.dataset)?;

    if !ctx.quiet() {
        println!("Password changed. Backups exported earlier still use the old password.");
    }
    Ok(())
}

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "vista", &mut std::io::stdout());
    Ok(())
}
