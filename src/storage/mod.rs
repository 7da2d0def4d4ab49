//! Tabular storage abstraction.
//!
//! Operators read the shared table from storage and write it back; where the
//! table actually lives is the storage implementation's business.

mod jsonl;

pub use jsonl::JsonlStorage;

use async_trait::async_trait;

use crate::dataframe::DataFrame;
use crate::error::StorageError;

/// Name of the table operators read and write.
pub const DATAFRAME: &str = "dataframe";

/// Trait for shared tabular storage.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the table registered under `name`.
    async fn read(&self, name: &str) -> Result<DataFrame, StorageError>;

    /// Write the table back.
    async fn write(&self, df: &DataFrame) -> Result<(), StorageError>;
}
