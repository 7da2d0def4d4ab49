//! Scoring operator backed by the UniEval evaluation model.
//!
//! Scores the generated text in one table column for fluency (through the
//! summarization checkpoint) and naturalness/understandability (through the
//! dialogue checkpoint), appending one score column per enabled metric.

use std::sync::Arc;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataframe::DataFrame;
use crate::error::OperatorError;
use crate::operators::Operator;
use crate::storage::{DATAFRAME, Storage};
use crate::unieval::{
    Device, Dimension, EvalTask, Evaluator, EvaluatorProvider, dialogue_records,
    summarization_records,
};

/// Which metrics the scorer computes. Unset metrics are not computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSelection {
    #[serde(default)]
    pub fluency: bool,
    #[serde(default)]
    pub naturalness: bool,
    #[serde(default)]
    pub understandability: bool,
}

impl MetricSelection {
    /// Enable every metric.
    pub fn all() -> Self {
        Self {
            fluency: true,
            naturalness: true,
            understandability: true,
        }
    }

    /// Parse a comma-separated metric list, e.g. `fluency,naturalness`.
    pub fn from_list(list: &str) -> Result<Self, OperatorError> {
        let mut selection = Self::default();
        for name in list.split(',') {
            let name = name.trim();
            match name {
                "" => continue,
                "fluency" => selection.fluency = true,
                "naturalness" => selection.naturalness = true,
                "understandability" => selection.understandability = true,
                other => {
                    return Err(OperatorError::UnknownMetric {
                        name: other.to_string(),
                    });
                }
            }
        }
        Ok(selection)
    }

    fn any(&self) -> bool {
        self.fluency || self.naturalness || self.understandability
    }

    fn wants_dialogue(&self) -> bool {
        self.naturalness || self.understandability
    }
}

/// A single-row batch: the output column's name and its text values.
#[derive(Debug, Clone)]
pub struct RowBatch {
    pub key: String,
    pub texts: Vec<String>,
}

/// Scores for one batch, keyed by score-column name. Values are
/// batch-ordered; `None` marks a dimension the evaluator did not report.
pub type ScoreBatch = Vec<(&'static str, Vec<Option<f64>>)>;

/// Evaluator handles for one scoring pass.
pub struct RunEvaluators {
    summarization: Option<Arc<dyn Evaluator>>,
    dialogue: Option<Arc<dyn Evaluator>>,
}

/// Scoring operator delegating to UniEval.
pub struct UniEvalScorer {
    metrics: MetricSelection,
    device: Device,
    provider: Arc<dyn EvaluatorProvider>,
}

impl UniEvalScorer {
    /// Registry name.
    pub const NAME: &'static str = "unieval_scorer";

    pub fn new(
        metrics: MetricSelection,
        device: Device,
        provider: Arc<dyn EvaluatorProvider>,
    ) -> Self {
        Self {
            metrics,
            device,
            provider,
        }
    }

    /// Build the evaluator handles for one scoring pass. At most one
    /// summarization and one dialogue evaluator are constructed, and both are
    /// reused for every row of the pass.
    pub fn prepare(&self) -> Result<RunEvaluators, OperatorError> {
        let summarization = if self.metrics.fluency {
            Some(self.provider.get(EvalTask::Summarization, &self.device)?)
        } else {
            None
        };
        let dialogue = if self.metrics.wants_dialogue() {
            Some(self.provider.get(EvalTask::Dialogue, &self.device)?)
        } else {
            None
        };
        Ok(RunEvaluators {
            summarization,
            dialogue,
        })
    }

    /// Score one row batch.
    ///
    /// Fluency goes through the summarization evaluator with an empty source
    /// and reference. Naturalness and understandability share a single
    /// dialogue evaluator call with an empty source and context. Disabled
    /// metrics produce no entries; a dimension missing from the evaluator
    /// result yields `None`.
    pub async fn evaluate_batch(
        &self,
        batch: &RowBatch,
        evaluators: &RunEvaluators,
    ) -> Result<ScoreBatch, OperatorError> {
        let mut results: ScoreBatch = Vec::new();

        if let Some(evaluator) = &evaluators.summarization {
            let records = summarization_records(&batch.texts, &[], &[]);
            let scores = evaluator
                .evaluate(&records, &[Dimension::Fluency], false)
                .await?;
            results.push((
                Dimension::Fluency.column(),
                scores.iter().map(|s| s.get(Dimension::Fluency)).collect(),
            ));
        }

        if let Some(evaluator) = &evaluators.dialogue {
            let records = dialogue_records(&batch.texts, &[], &[]);
            let mut dims = Vec::new();
            if self.metrics.naturalness {
                dims.push(Dimension::Naturalness);
            }
            if self.metrics.understandability {
                dims.push(Dimension::Understandability);
            }
            let scores = evaluator.evaluate(&records, &dims, false).await?;
            for dim in dims {
                results.push((dim.column(), scores.iter().map(|s| s.get(dim)).collect()));
            }
        }

        Ok(results)
    }

    /// Score every row of `output_key` in `df`, one row per evaluator
    /// request, in table order. `input_key` is accepted for operator
    /// signature compatibility; scoring is reference-free and ignores it.
    pub async fn eval(
        &self,
        df: &DataFrame,
        _input_key: &str,
        output_key: &str,
    ) -> Result<Vec<ScoreBatch>, OperatorError> {
        let texts = df
            .text_column(output_key)
            .ok_or_else(|| OperatorError::ColumnNotFound {
                key: output_key.to_string(),
            })?;
        let evaluators = self.prepare()?;

        let progress = ProgressBar::new(texts.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{msg} {bar:40} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.set_message(Self::NAME);

        let mut scores = Vec::with_capacity(texts.len());
        for text in texts {
            let batch = RowBatch {
                key: output_key.to_string(),
                texts: vec![text],
            };
            scores.push(self.evaluate_batch(&batch, &evaluators).await?);
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(scores)
    }
}

#[async_trait]
impl Operator for UniEvalScorer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self, lang: &str) -> &'static str {
        if lang == "zh" {
            "使用UniEval评分器评估指令质量"
        } else {
            "Evaluate instruction quality using the UniEval scorer."
        }
    }

    async fn run(
        &self,
        storage: &dyn Storage,
        input_key: &str,
        output_key: &str,
    ) -> Result<(), OperatorError> {
        if !self.metrics.any() {
            tracing::warn!("No metrics enabled; the table will pass through unchanged");
        }

        let mut df = storage.read(DATAFRAME).await?;
        let scores = self.eval(&df, input_key, output_key).await?;

        let n_rows = scores.len();
        for batch in scores {
            for (key, values) in batch {
                for value in values {
                    let value = match value {
                        Some(v) => Value::from(v),
                        None => Value::Null,
                    };
                    df.append_value(key, value);
                }
            }
        }

        storage.write(&df).await?;
        tracing::info!("Scored {} rows on device {}", n_rows, self.device);
        Ok(())
    }
}
