//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (vault, entry, event, backup data).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password or corrupted data, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// Backup document failed validation.
    pub const MALFORMED_BACKUP: i32 = 6;
}

/// Environment variables read by the CLI.
pub mod env_vars {
    pub const PASSPHRASE: &str = "VISTA_PASSPHRASE";
    /// Read by `vista passwd` in place of the new-password prompt
    pub const NEW_PASSPHRASE: &str = "VISTA_NEW_PASSPHRASE";
    pub const CONFIG: &str = "VISTA_CONFIG";
    pub const LOG: &str = "VISTA_LOG";
}

/// Password attempts allowed at an interactive prompt.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Entries shown by `vista list` without `--limit`.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Date pattern for listings when the config does not set one.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Backup file name used when exporting to a directory.
pub const BACKUP_FILE_PREFIX: &str = "vista-backup";
