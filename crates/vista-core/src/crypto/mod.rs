//! Cryptographic operations for Vista.
//!
//! This module provides key derivation and authenticated encryption using
//! well-audited RustCrypto implementations:
//! - **PBKDF2-HMAC-SHA256**: password-based key derivation, 100k rounds
//! - **AES-256-GCM**: authenticated encryption with a random 96-bit nonce
//!
//! ## Security Model
//!
//! - The password never leaves the process and is never stored
//! - No password verifier exists; the GCM tag is the only wrong-password check
//! - Key material is zeroized from memory on drop and cannot be exported
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft or tampering of the persisted slots or an exported backup
//! - Offline brute-force attacks (slowed by the KDF work factor)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory

pub mod cipher;
pub mod key;
pub mod salt;

pub use cipher::{decrypt, encrypt, EncryptedBlob, IV_LEN};
pub use key::{derive_key, DerivedKey, PBKDF2_ITERATIONS};
pub use salt::{Salt, SALT_LEN};
