//! Backup export and import. Neither command needs the password.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use chrono::Utc;
use vista_core::backup::{export_backup, import_backup, read_backup_file, write_backup_file};
use vista_core::storage::{Slot, SlotStore};

use crate::app::AppContext;
use crate::cli::{ExportArgs, ImportArgs};
use crate::constants::BACKUP_FILE_PREFIX;
use crate::errors::CliError;

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let destination = export_destination(args.destination.as_deref(), ctx.backup_dir()?)?;
    let store = ctx.open_existing_store()?;
    let doc = export_backup(&store)?;

    if destination.exists() && std::io::stdin().is_terminal() && !ctx.quiet() {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", destination.display()))
            .default(false)
            .interact()?;
        if !proceed {
            return Err(anyhow::anyhow!("Export cancelled"));
        }
    }
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create backup directory {}: {}", parent.display(), e)
        })?;
    }

    write_backup_file(&destination, &doc)?;
    if !ctx.quiet() {
        println!("Exported encrypted backup to {}", destination.display());
    }
    Ok(())
}

/// An explicit file wins; otherwise a timestamped file in the configured directory.
fn export_destination(explicit: Option<&str>, backup_dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }
    let dir = backup_dir.ok_or_else(|| {
        CliError::invalid_input(
            "No destination given and no [backup] directory configured.\nHint: Run `vista export <FILE>`.",
        )
    })?;
    Ok(dir.join(format!(
        "{}-{}.json",
        BACKUP_FILE_PREFIX,
        Utc::now().format("%Y%m%d-%H%M%S")
    )))
}

pub fn handle_import(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let source = Path::new(&args.source);
    if !source.is_file() {
        return Err(CliError::not_found(
            format!("Backup file {} not found", source.display()),
            "Hint: Pass the path of a file written by `vista export`.",
        )
        .into());
    }
    let doc = read_backup_file(source)?;
    doc.validate()?;

    let mut store = ctx.open_store()?;
    let has_existing = store.contains(Slot::Salt)? || store.contains(Slot::Entries)?;
    if has_existing && !args.yes {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::invalid_input(
                "Import replaces the existing vault.\nHint: Re-run with --yes to confirm.",
            )
            .into());
        }
        let proceed = dialoguer::Confirm::new()
            .with_prompt("Import replaces every entry and event in this vault. Continue?")
            .default(false)
            .interact()?;
        if !proceed {
            return Err(anyhow::anyhow!("Import cancelled"));
        }
    }

    import_backup(&mut store, &doc)?;
    if !ctx.quiet() {
        println!(
            "Imported backup into {}. Unlock it with the password it was exported under.",
            store.root().display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_destination_wins() {
        let path = export_destination(Some("out.json"), Some(PathBuf::from("/backups"))).unwrap();
        assert_eq!(path, PathBuf::from("out.json"));
    }

    #[test]
    fn test_configured_directory_gets_timestamped_file() {
        let path = export_destination(None, Some(PathBuf::from("/backups"))).unwrap();
        assert!(path.starts_with("/backups"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("vista-backup-"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_no_destination_is_invalid_input() {
        let err = export_destination(None, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidInput(_))
        ));
    }
}
