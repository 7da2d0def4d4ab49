//! UniEval model provider integration.
//!
//! UniEval is a family of pretrained evaluators that score text along named
//! quality dimensions. Each task kind (summarization, dialogue) is a separate
//! checkpoint; this module talks to a serving endpoint hosting them and keeps
//! the evaluator behind a trait so tests and alternative backends can swap it
//! out.

mod client;
mod device;
mod record;

pub use client::{DimScores, Evaluator, EvaluatorProvider, HttpEvaluator, HttpEvaluatorProvider};
pub use device::Device;
pub use record::{EvalRecord, dialogue_records, summarization_records};

use std::fmt;

use serde::Serialize;

/// Task kind selecting which UniEval checkpoint scores the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalTask {
    Summarization,
    Dialogue,
}

impl EvalTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvalTask::Summarization => "summarization",
            EvalTask::Dialogue => "dialogue",
        }
    }
}

impl fmt::Display for EvalTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A quality dimension the evaluator can score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Fluency,
    Naturalness,
    Understandability,
}

impl Dimension {
    /// Wire name of the dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Fluency => "fluency",
            Dimension::Naturalness => "naturalness",
            Dimension::Understandability => "understandability",
        }
    }

    /// Name of the score column this dimension produces.
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Fluency => "UniEvalFluencyScore",
            Dimension::Naturalness => "UniEvalNaturalnessScore",
            Dimension::Understandability => "UniEvalUnderstandabilityScore",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(EvalTask::Summarization.to_string(), "summarization");
        assert_eq!(EvalTask::Dialogue.to_string(), "dialogue");
        assert_eq!(Dimension::Fluency.as_str(), "fluency");
        assert_eq!(
            serde_json::to_value(Dimension::Understandability).unwrap(),
            serde_json::json!("understandability")
        );
    }

    #[test]
    fn test_score_columns() {
        assert_eq!(Dimension::Fluency.column(), "UniEvalFluencyScore");
        assert_eq!(Dimension::Naturalness.column(), "UniEvalNaturalnessScore");
        assert_eq!(
            Dimension::Understandability.column(),
            "UniEvalUnderstandabilityScore"
        );
    }
}
