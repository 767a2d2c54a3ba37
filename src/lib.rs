//! # Products - command-line product inventory
//!
//! Records products together with the shop they come from and their cost,
//! persists them in SQLite and lists them back.
//!
//! Products provides:
//! - Idempotent schema initialization for the `shops` and `prods` tables
//! - Get-or-create resolution of shops by title
//! - Product insertion and join queries, optionally filtered by shop
//! - A bordered console table for product listings

pub mod product;
pub mod storage;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use product::{Product, ProductRow, Shop};
pub use storage::ProductStore;

use std::path::PathBuf;

/// Result type alias for Products operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Products operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the error is a violated storage constraint (e.g. a dangling shop reference)
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::Storage(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
