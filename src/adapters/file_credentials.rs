//! File-backed credential store.
//!
//! Values live in a flat JSON object, `~/.netkit/credentials.json` by
//! default. The file is read once on open and rewritten on every change.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::traits::{CredentialStore, CredentialsError};

/// Directory name under the user's home directory.
const CREDENTIALS_DIR: &str = ".netkit";

/// Credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Credential store persisted to a JSON file.
///
/// # Example
///
/// ```ignore
/// use netkit::adapters::FileCredentialStore;
/// use netkit::traits::CredentialStore;
///
/// let store = FileCredentialStore::open_default()?;
/// if store.get_string("accessToken").is_none() {
///     println!("Not signed in");
/// }
/// ```
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileCredentialStore {
    /// Open the store at `~/.netkit/credentials.json`.
    pub fn open_default() -> Result<Self, CredentialsError> {
        let home = dirs::home_dir().ok_or(CredentialsError::NoHomeDirectory)?;
        Self::open(home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialsError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(contents) if contents.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(contents) => serde_json::from_slice(&contents)
                .map_err(|e| CredentialsError::Serialization(e.to_string()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(CredentialsError::LoadFailed(e.to_string())),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "Opened credential store");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Get the path to the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file from `values`. Creates the parent directory if it
    /// doesn't exist.
    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), CredentialsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
            }
        }

        let file =
            File::create(&self.path).map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, values)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        change(&mut values);
        if let Err(e) = self.persist(&values) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist credentials");
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|values| {
            values.remove(key);
        });
    }
}
