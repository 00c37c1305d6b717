//! Local storage for the API credential.
//!
//! The credential lives in a dotenv-style file (`GOOGLE_API_KEY=value`) in
//! the working directory. It is stored in plaintext and overwritten
//! wholesale; nothing here checks whether the key is actually accepted.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default file the credential is stored in.
pub const DEFAULT_CREDENTIAL_FILE: &str = ".env";

/// Variable name the credential is stored under.
pub const CREDENTIAL_KEY: &str = "GOOGLE_API_KEY";

/// Where users obtain a new key.
pub const API_KEY_URL: &str = "https://makersuite.google.com/app/apikey";

/// An API key.
///
/// Never empty. `Debug` does not print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a key, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(Error::validation("API key must not be empty"));
        }
        Ok(Self(value.to_string()))
    }

    /// The raw key, for building requests.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Reads and writes the credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    env_fallback: bool,
}

impl CredentialStore {
    /// A store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_fallback: false,
        }
    }

    /// Also consult the process environment when the file has no key.
    pub fn with_env_fallback(mut self) -> Self {
        self.env_fallback = true;
        self
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists `credential`, replacing whatever the file held before.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        let line = format!("{CREDENTIAL_KEY}={}", credential.expose());
        fs::write(&self.path, line).map_err(|err| {
            Error::io(
                format!("failed to write {}", self.path.display()),
                err,
            )
        })
    }

    /// Returns the stored credential, or `None` when there is none.
    ///
    /// A missing file is not an error.
    pub fn load(&self) -> Result<Option<Credential>> {
        if let Some(credential) = self.load_from_file()? {
            return Ok(Some(credential));
        }
        if self.env_fallback {
            return Ok(env::var(CREDENTIAL_KEY)
                .ok()
                .and_then(|value| Credential::new(value).ok()));
        }
        Ok(None)
    }

    fn load_from_file(&self) -> Result<Option<Credential>> {
        let entries = match dotenvy::from_path_iter(&self.path) {
            Ok(entries) => entries,
            Err(err) if err.not_found() => return Ok(None),
            Err(err) => return Err(self.parse_error(err)),
        };
        let mut found = None;
        for entry in entries {
            let (key, value) = entry.map_err(|err| self.parse_error(err))?;
            if key == CREDENTIAL_KEY {
                found = Credential::new(value).ok();
            }
        }
        Ok(found)
    }

    fn parse_error(&self, err: dotenvy::Error) -> Error {
        match err {
            dotenvy::Error::Io(io) => {
                Error::io(format!("failed to read {}", self.path.display()), io)
            }
            other => Error::serialization(
                format!("failed to parse {}: {other}", self.path.display()),
                Some(Box::new(other)),
            ),
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_CREDENTIAL_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_rejects_blank() {
        assert!(Credential::new("").is_err());
        assert!(Credential::new("   \t").is_err());
        assert_eq!(Credential::new("  abc \n").unwrap().expose(), "abc");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::new("AIzaSecret").unwrap();
        assert!(!format!("{credential:?}").contains("AIzaSecret"));
    }

    #[test]
    fn missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join(".env"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let credential = Credential::new("AIzaValidKey").unwrap();
        CredentialStore::new(&path).save(&credential).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "GOOGLE_API_KEY=AIzaValidKey"
        );
        let fresh = CredentialStore::new(&path);
        assert_eq!(fresh.load().unwrap(), Some(credential));
    }

    #[test]
    fn save_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "OTHER=1\nGOOGLE_API_KEY=old\n").unwrap();

        let store = CredentialStore::new(&path);
        store.save(&Credential::new("new").unwrap()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "GOOGLE_API_KEY=new");
        assert_eq!(store.load().unwrap().unwrap().expose(), "new");
    }

    #[test]
    fn file_without_key_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# nothing here\nOTHER=1\n").unwrap();
        assert_eq!(CredentialStore::new(&path).load().unwrap(), None);
    }
}
