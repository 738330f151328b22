//! Input and parsing helper functions for the CLI.

use std::io::{self, IsTerminal, Read};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use dialoguer::Password;
use secrecy::SecretString;

use crate::constants::env_vars;
use crate::errors::CliError;

/// Password from VISTA_PASSPHRASE, if set and non-blank.
pub fn env_password() -> Option<SecretString> {
    std::env::var(env_vars::PASSPHRASE)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

/// Prompt for the vault password.
pub fn prompt_password(interactive: bool) -> anyhow::Result<SecretString> {
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            env_vars::PASSPHRASE
        ));
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a new password with confirmation.
pub fn prompt_new_password(prompt: &str, interactive: bool) -> anyhow::Result<SecretString> {
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            env_vars::PASSPHRASE
        ));
    }
    Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Normalise an entry date argument; defaults to now.
///
/// Bare `YYYY-MM-DD` dates are kept as given, timestamps are rewritten in UTC.
pub fn parse_entry_date(value: Option<&str>, now: DateTime<Utc>) -> anyhow::Result<String> {
    let Some(value) = value else {
        return Ok(now.to_rfc3339_opts(SecondsFormat::Millis, true));
    };
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return Ok(value.to_string());
    }
    Err(CliError::invalid_input(format!(
        "Invalid date (expected YYYY-MM-DD or ISO-8601): {}",
        value
    ))
    .into())
}

pub fn parse_day(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CliError::invalid_input(format!("Invalid date (expected YYYY-MM-DD): {}", value)).into()
    })
}

pub fn parse_time(value: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        CliError::invalid_input(format!("Invalid time (expected HH:MM): {}", value)).into()
    })
}

/// Resolve a full ID or a unique prefix against known IDs.
pub fn resolve_id<'a, I>(ids: I, wanted: &str, kind: &str, hint: &str) -> anyhow::Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted = wanted.trim().to_lowercase();
    if wanted.is_empty() {
        return Err(CliError::invalid_input(format!("{} ID cannot be empty", kind)).into());
    }

    let mut matches = Vec::new();
    for id in ids {
        if id.eq_ignore_ascii_case(&wanted) {
            return Ok(id.to_string());
        }
        if id.to_lowercase().starts_with(&wanted) {
            matches.push(id);
        }
    }

    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => Err(CliError::not_found(format!("{} {} not found", kind, wanted), hint).into()),
        _ => Err(CliError::invalid_input(format!(
            "{} ID prefix {} is ambiguous ({} matches); use more characters",
            kind,
            wanted,
            matches.len()
        ))
        .into()),
    }
}

/// Read entry body from --body flag, stdin, or $EDITOR.
pub fn read_entry_body(body: Option<String>, initial: &str) -> anyhow::Result<String> {
    if let Some(value) = body {
        if value.trim().is_empty() {
            return Err(CliError::invalid_input("--body cannot be empty").into());
        }
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end().to_string();
        if trimmed.is_empty() {
            return Err(CliError::invalid_input("No input provided on stdin").into());
        }
        return Ok(trimmed);
    }

    read_body_from_editor(initial)
}

/// Open $EDITOR to compose entry body.
fn read_body_from_editor(initial: &str) -> anyhow::Result<String> {
    let editor = std::env::var("EDITOR").map_err(|_| {
        anyhow::anyhow!("$EDITOR is not set; use --body or pipe content via stdin")
    })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let filename = format!("vista_entry_{}_{}.md", std::process::id(), nanos);
    let path = std::env::temp_dir().join(filename);

    std::fs::write(&path, initial)
        .map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;

    let status = Command::new(editor)
        .arg(&path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        let _ = std::fs::remove_file(&path);
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?;
    let _ = std::fs::remove_file(&path);

    let trimmed = contents.trim_end().to_string();
    if trimmed.is_empty() {
        return Err(CliError::invalid_input("Entry body is empty").into());
    }

    Ok(trimmed)
}
