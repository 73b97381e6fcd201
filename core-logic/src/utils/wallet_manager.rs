use crate::error::ConfigError;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One wallet to process. The key is wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Account {
    private_key: String,
}

impl Account {
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
        }
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("private_key", &"***REDACTED***")
            .finish()
    }
}

pub struct WalletManager;

impl WalletManager {
    pub const PK_FILE: &'static str = "pk.txt";

    /// Reads one private key per line. Blank lines and `#` comments are skipped.
    pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<Account>, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if !path.exists() {
            return Err(ConfigError::FileNotFound { path: display });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: display.clone(),
            msg: e.to_string(),
        })?;

        let accounts: Vec<Account> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(Account::new)
            .collect();

        if accounts.is_empty() {
            return Err(ConfigError::EmptyFile { path: display });
        }

        info!(
            "Loaded {} account{}",
            accounts.len(),
            if accounts.len() == 1 { "" } else { "s" }
        );
        Ok(accounts)
    }
}
