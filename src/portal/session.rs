// src/portal/session.rs

//! Session cache and portal credentials.
//!
//! The cache is a JSON list of browser cookies. It is read once at start and
//! written once after a successful login; deleting the file forces a fresh
//! login on the next run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::PortalConfig;

/// One cookie of an authenticated portal session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub domain: String,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default)]
    pub secure: bool,

    #[serde(default)]
    pub http_only: bool,

    /// Expiry in seconds since the epoch; `None` for session cookies
    #[serde(default)]
    pub expires: Option<f64>,
}

fn default_path() -> String {
    "/".to_string()
}

/// Reads and writes the session cache file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load cached cookies. A missing or unreadable cache yields `None`.
    pub async fn load(&self) -> Result<Option<Vec<StoredCookie>>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Io(e)),
        };
        match serde_json::from_slice::<Vec<StoredCookie>>(&bytes) {
            Ok(cookies) if !cookies.is_empty() => Ok(Some(cookies)),
            Ok(_) => Ok(None),
            Err(e) => {
                log::warn!("Ignoring unreadable session cache {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    /// Persist cookies atomically.
    pub async fn save(&self, cookies: &[StoredCookie]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        let bytes = serde_json::to_vec_pretty(cookies)?;
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Delete the cache so the next start logs in again.
    pub async fn discard(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// Portal login credentials, read from the environment.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn from_env(config: &PortalConfig) -> Result<Self> {
        let read = |var: &str| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::login(format!("environment variable {var} is not set")))
        };
        Ok(Self {
            email: read(&config.email_env)?,
            password: read(&config.password_env)?,
        })
    }
}
