//! Pipeline operators.
//!
//! An operator reads the shared table from storage, transforms it, and
//! writes it back. Operators are constructed through the driver-owned
//! [`OperatorRegistry`].

mod registry;
mod unieval_scorer;

pub use registry::{OperatorParams, OperatorRegistry};
pub use unieval_scorer::{MetricSelection, RowBatch, RunEvaluators, ScoreBatch, UniEvalScorer};

use async_trait::async_trait;

use crate::error::OperatorError;
use crate::storage::Storage;

/// Trait for pipeline operators.
#[async_trait]
pub trait Operator: Send + Sync {
    /// Registry name of the operator.
    fn name(&self) -> &str;

    /// Human-readable description. `"zh"` selects the Chinese text; any
    /// other language code falls back to English.
    fn description(&self, lang: &str) -> &'static str;

    /// Read the table from `storage`, transform it, and write it back.
    ///
    /// `input_key` and `output_key` name the table columns the operator
    /// consumes; how each is used (or ignored) is operator-specific.
    async fn run(
        &self,
        storage: &dyn Storage,
        input_key: &str,
        output_key: &str,
    ) -> Result<(), OperatorError>;
}
