use crate::error::DbError;
use core_types::{Account, Trade};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const ACCOUNTS_FILE: &str = "accounts.json";
pub const TRADES_FILE: &str = "trades.json";
pub const ACTIVE_ACCOUNT_FILE: &str = "active_account.json";

/// Where the journal keeps its accounts, trades and active-account selection.
///
/// Implementations round-trip the records losslessly; they do not enforce any
/// relationship between accounts and trades.
pub trait JournalBackend: Send + Sync {
    fn load_accounts(&self) -> Result<Vec<Account>, DbError>;

    fn save_accounts(&mut self, accounts: &[Account]) -> Result<(), DbError>;

    fn load_trades(&self) -> Result<Vec<Trade>, DbError>;

    fn save_trades(&mut self, trades: &[Trade]) -> Result<(), DbError>;

    fn load_active_account_id(&self) -> Result<Option<String>, DbError>;

    fn save_active_account_id(&mut self, id: Option<&str>) -> Result<(), DbError>;
}

/// Stores each collection as a pretty-printed JSON file in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Uses `dir` as the journal directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, DbError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| DbError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A missing file reads as `None`; an unreadable or corrupt one is an error.
    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, DbError> {
        let path = self.dir.join(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(DbError::Io { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| DbError::Corrupt { path, source })
    }

    /// Writes through a temporary file and a rename so a failed write never
    /// leaves a truncated journal behind.
    fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), DbError> {
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, json).map_err(|source| DbError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            DbError::Io { path, source }
        })
    }
}

impl JournalBackend for JsonFileBackend {
    fn load_accounts(&self) -> Result<Vec<Account>, DbError> {
        Ok(self.read(ACCOUNTS_FILE)?.unwrap_or_default())
    }

    fn save_accounts(&mut self, accounts: &[Account]) -> Result<(), DbError> {
        self.write(ACCOUNTS_FILE, accounts)
    }

    fn load_trades(&self) -> Result<Vec<Trade>, DbError> {
        Ok(self.read(TRADES_FILE)?.unwrap_or_default())
    }

    fn save_trades(&mut self, trades: &[Trade]) -> Result<(), DbError> {
        self.write(TRADES_FILE, trades)
    }

    fn load_active_account_id(&self) -> Result<Option<String>, DbError> {
        self.read(ACTIVE_ACCOUNT_FILE)
    }

    fn save_active_account_id(&mut self, id: Option<&str>) -> Result<(), DbError> {
        match id {
            Some(id) => self.write(ACTIVE_ACCOUNT_FILE, id),
            None => {
                let path = self.dir.join(ACTIVE_ACCOUNT_FILE);
                match fs::remove_file(&path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    Err(source) => Err(DbError::Io { path, source }),
                }
            }
        }
    }
}

/// Keeps the journal in memory only. Used for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    pub accounts: Vec<Account>,
    pub trades: Vec<Trade>,
    pub active_account_id: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JournalBackend for MemoryBackend {
    fn load_accounts(&self) -> Result<Vec<Account>, DbError> {
        Ok(self.accounts.clone())
    }

    fn save_accounts(&mut self, accounts: &[Account]) -> Result<(), DbError> {
        self.accounts = accounts.to_vec();
        Ok(())
    }

    fn load_trades(&self) -> Result<Vec<Trade>, DbError> {
        Ok(self.trades.clone())
    }

    fn save_trades(&mut self, trades: &[Trade]) -> Result<(), DbError> {
        self.trades = trades.to_vec();
        Ok(())
    }

    fn load_active_account_id(&self) -> Result<Option<String>, DbError> {
        Ok(self.active_account_id.clone())
    }

    fn save_active_account_id(&mut self, id: Option<&str>) -> Result<(), DbError> {
        self.active_account_id = id.map(str::to_string);
        Ok(())
    }
}
