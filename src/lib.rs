//! Reference-free quality scoring for generated text.
//!
//! `uniscore` scores the text in one column of a JSONL dataset with the
//! UniEval evaluation model and appends the scores as new columns
//! (`UniEvalFluencyScore`, `UniEvalNaturalnessScore`,
//! `UniEvalUnderstandabilityScore`). The scoring operator, its registry, and
//! the storage layer are library code; the `uniscore` binary is a thin
//! pipeline driver on top.

pub mod config;
pub mod dataframe;
pub mod error;
pub mod operators;
pub mod storage;
pub mod unieval;

pub use dataframe::DataFrame;
pub use operators::{MetricSelection, Operator, OperatorRegistry, UniEvalScorer};
pub use storage::{JsonlStorage, Storage};
