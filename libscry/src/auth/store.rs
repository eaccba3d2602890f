//! Credential storage for the fixed registry.
//!
//! A trait-based boundary so the resolver only ever sees "credential
//! material exists or it does not". The file implementation keeps a TOML
//! file with restricted permissions (0600); secrets are base64 encoded
//! for basic obfuscation, not for security.

use crate::auth::Credentials;
use crate::error::{Result, ScryError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Read/write access to stored registry credentials.
pub trait CredentialStore {
    /// Store credentials for a registry host.
    fn store(&mut self, registry: &str, credentials: &Credentials) -> Result<()>;

    /// Retrieve credentials for a registry host, if any are stored.
    fn get(&self, registry: &str) -> Result<Option<Credentials>>;

    /// Remove credentials for a registry host.
    fn remove(&mut self, registry: &str) -> Result<()>;

    /// List all registry hosts with stored credentials.
    fn list(&self) -> Result<Vec<String>>;
}

/// Serialized credential representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct StoredCredential {
    /// Username; empty means "secret only", the token broker will try
    /// fallback identities
    username: String,
    /// Secret, base64 encoded
    secret: String,
}

/// File-based credential store.
///
/// # Examples
///
/// ```no_run
/// use libscry::auth::{Credentials, CredentialStore, FileCredentialStore};
/// use std::path::PathBuf;
///
/// # fn example() -> libscry::error::Result<()> {
/// let path = PathBuf::from("/home/user/.config/scry/credentials.toml");
/// let mut store = FileCredentialStore::new(path)?;
///
/// store.store("ghcr.io", &Credentials::basic("", "ghp_example"))?;
/// assert!(store.get("ghcr.io")?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    credentials: HashMap<String, StoredCredential>,
}

impl FileCredentialStore {
    /// Opens a store at `path`, loading it if the file exists.
    ///
    /// The parent directory is created if missing.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ScryError::config_with_source(
                    "Failed to create credentials directory",
                    parent.to_str(),
                    e,
                )
            })?;
        }

        let credentials = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            HashMap::new()
        };

        Ok(Self { path, credentials })
    }

    fn load_from_file(path: &PathBuf) -> Result<HashMap<String, StoredCredential>> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ScryError::config_with_source("Failed to read credentials file", path.to_str(), e)
        })?;

        toml::from_str(&contents).map_err(|e| {
            ScryError::config_with_source("Failed to parse credentials file", path.to_str(), e)
        })
    }

    fn save_to_file(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.credentials).map_err(|e| {
            ScryError::config_with_source("Failed to serialize credentials", self.path.to_str(), e)
        })?;

        fs::write(&self.path, contents).map_err(|e| {
            ScryError::config_with_source("Failed to write credentials file", self.path.to_str(), e)
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, permissions).map_err(|e| {
                ScryError::config_with_source(
                    "Failed to set credentials file permissions",
                    self.path.to_str(),
                    e,
                )
            })?;
        }

        Ok(())
    }

    fn encode_credential(credentials: &Credentials) -> Result<StoredCredential> {
        match credentials {
            Credentials::Basic { username, secret } => {
                use base64::{Engine as _, engine::general_purpose};
                Ok(StoredCredential {
                    username: username.clone(),
                    secret: general_purpose::STANDARD.encode(secret),
                })
            }
            Credentials::Anonymous => {
                Err(ScryError::validation("Cannot store anonymous credentials"))
            }
            Credentials::Bearer { .. } => Err(ScryError::validation(
                "Bearer tokens are short-lived and are not stored",
            )),
        }
    }

    fn decode_credential(stored: &StoredCredential) -> Result<Credentials> {
        use base64::{Engine as _, engine::general_purpose};
        let decoded = general_purpose::STANDARD
            .decode(&stored.secret)
            .map_err(|e| ScryError::validation_with_source("Failed to decode secret", e))?;

        let secret = String::from_utf8(decoded)
            .map_err(|e| ScryError::validation_with_source("Invalid secret encoding", e))?;

        Ok(Credentials::Basic {
            username: stored.username.clone(),
            secret,
        })
    }
}

impl CredentialStore for FileCredentialStore {
    fn store(&mut self, registry: &str, credentials: &Credentials) -> Result<()> {
        let stored = Self::encode_credential(credentials)?;
        self.credentials.insert(registry.to_string(), stored);
        self.save_to_file()
    }

    fn get(&self, registry: &str) -> Result<Option<Credentials>> {
        match self.credentials.get(registry) {
            Some(stored) => Ok(Some(Self::decode_credential(stored)?)),
            None => Ok(None),
        }
    }

    fn remove(&mut self, registry: &str) -> Result<()> {
        self.credentials.remove(registry);
        self.save_to_file()
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.credentials.keys().cloned().collect())
    }
}
