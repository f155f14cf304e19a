//! Durable key-value storage for smelterdeck.
//!
//! This module provides the small persistent store backing the user
//! state cell, kept under `~/.smelterdeck/` as one JSON file per key.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::StorageError;

/// The storage directory name.
const STORE_DIR: &str = ".smelterdeck";

/// The fixed key the user record is stored under.
const USER_KEY: &str = "user";

// ============================================================================
// Key-value store
// ============================================================================

/// File-per-key JSON store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Directory the key files live in.
    dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Create a store under the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn open() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::new(home.join(STORE_DIR)))
    }

    /// Path of the file backing `key`.
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read the raw stored string for `key`.
    ///
    /// Returns `None` if the key file doesn't exist or can't be read.
    pub fn read_raw(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read stored value");
                None
            }
        }
    }

    /// Write the raw string for `key`, creating the store directory if
    /// needed. Returns `true` if successful, `false` otherwise.
    pub fn write_raw(&self, key: &str, value: &str) -> bool {
        match self.try_write(key, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to write stored value");
                false
            }
        }
    }

    fn try_write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|err| StorageError::io(&self.dir, err))?;
        }

        let path = self.key_path(key);
        fs::write(&path, value).map_err(|err| StorageError::io(path, err))
    }

    /// Remove the value stored under `key`.
    ///
    /// Returns `true` if successful or the key didn't exist.
    pub fn remove(&self, key: &str) -> bool {
        let path = self.key_path(key);
        if !path.exists() {
            return true;
        }

        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to remove stored value");
                false
            }
        }
    }
}

// ============================================================================
// User record
// ============================================================================

/// The authenticated user's stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserCreds {
    pub username: String,
    pub is_admin: bool,
}

/// What a user read produced.
///
/// A record that fails to parse is carried as `Opaque` rather than
/// thrown away, matching a read contract of "return what was stored,
/// parsed when possible".
#[derive(Debug, Clone, PartialEq)]
pub enum StoredUser {
    Creds(UserCreds),
    Opaque(String),
}

impl StoredUser {
    /// The parsed record, if this read parsed.
    pub fn creds(&self) -> Option<&UserCreds> {
        match self {
            StoredUser::Creds(creds) => Some(creds),
            StoredUser::Opaque(_) => None,
        }
    }

    /// Whether the stored user has admin rights. An opaque record never
    /// grants anything.
    pub fn is_admin(&self) -> bool {
        self.creds().map(|creds| creds.is_admin).unwrap_or(false)
    }
}

/// User record storage under the fixed key.
#[derive(Debug, Clone)]
pub struct UserStore {
    store: LocalStore,
}

impl UserStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Open the user store under the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn open() -> Option<Self> {
        LocalStore::open().map(Self::new)
    }

    /// Path to the user record file.
    pub fn user_path(&self) -> PathBuf {
        self.store.key_path(USER_KEY)
    }

    /// Load the stored user record.
    ///
    /// A missing or unreadable file is `None`. A file that exists but
    /// doesn't parse as [`UserCreds`] is logged and returned raw.
    pub fn load(&self) -> Option<StoredUser> {
        let raw = self.store.read_raw(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(creds) => Some(StoredUser::Creds(creds)),
            Err(err) => {
                tracing::warn!(error = %err, "stored user record is not valid JSON");
                Some(StoredUser::Opaque(raw))
            }
        }
    }

    /// Save the user record. Returns `true` if successful.
    pub fn save(&self, creds: &UserCreds) -> bool {
        let json = match serde_json::to_string_pretty(creds) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %StorageError::from(err), "failed to encode user record");
                return false;
            }
        };
        self.store.write_raw(USER_KEY, &json)
    }

    /// Remove the stored user record.
    ///
    /// Returns `true` if successful or nothing was stored.
    pub fn clear(&self) -> bool {
        self.store.remove(USER_KEY)
    }
}
