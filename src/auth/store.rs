// Allow dead code: MemoryTokenStore is the test-facing implementation
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Token file name in the data directory
const TOKEN_FILE: &str = "auth_token";

/// Opaque storage for the bearer token. No validation, expiry, or
/// encryption happens at this layer.
///
/// The store is injected into `ApiClient` and `AuthSession` so tests can
/// substitute `MemoryTokenStore` for the durable one.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str) -> Result<()>;
    fn clear_token(&self) -> Result<()>;
}

/// Durable token store backed by a single file under the platform data
/// directory. Survives restarts; an empty or missing file means no token.
pub struct FileTokenStore {
    data_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        let contents = std::fs::read_to_string(self.token_path()).ok()?;
        let token = contents.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn set_token(&self, token: &str) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .context("Failed to create data directory")?;
        std::fs::write(self.token_path(), token).context("Failed to write token file")?;
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

/// In-memory token store. Used by tests in place of the file-backed one.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.lock().expect("token lock poisoned").clone()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        *self.token.lock().expect("token lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        *self.token.lock().expect("token lock poisoned") = None;
        Ok(())
    }
}
