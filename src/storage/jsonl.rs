//! File-backed JSONL storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::dataframe::DataFrame;
use crate::error::StorageError;
use crate::storage::{DATAFRAME, Storage};

/// Storage that reads one JSONL file and writes another (or the same one).
pub struct JsonlStorage {
    input_path: PathBuf,
    output_path: PathBuf,
}

impl JsonlStorage {
    /// Read from `input_path`, write to `output_path`.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Read and rewrite the same file.
    pub fn in_place(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            input_path: path.clone(),
            output_path: path,
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

#[async_trait]
impl Storage for JsonlStorage {
    async fn read(&self, name: &str) -> Result<DataFrame, StorageError> {
        if name != DATAFRAME {
            return Err(StorageError::UnknownTable {
                name: name.to_string(),
            });
        }

        let text = tokio::fs::read_to_string(&self.input_path).await?;
        let df = DataFrame::from_jsonl(&text)?;
        tracing::debug!(
            "Read {} rows ({} columns) from {}",
            df.n_rows(),
            df.columns().len(),
            self.input_path.display()
        );
        Ok(df)
    }

    async fn write(&self, df: &DataFrame) -> Result<(), StorageError> {
        tokio::fs::write(&self.output_path, df.to_jsonl()).await?;
        tracing::debug!(
            "Wrote {} rows ({} columns) to {}",
            df.n_rows(),
            df.columns().len(),
            self.output_path.display()
        );
        Ok(())
    }
}
