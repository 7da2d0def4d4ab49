//! Record formatting for the UniEval service.
//!
//! Mirrors the record layout the UniEval checkpoints expect: summarization
//! records pair the output with a source and a reference, dialogue records
//! pair it with a source and a dialogue context.

use serde::Serialize;

/// One formatted sample for the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalRecord {
    pub system_output: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Build summarization-task records, one per output. Missing entries in the
/// companion slices become empty strings, which keeps scoring reference-free.
pub fn summarization_records(
    outputs: &[String],
    sources: &[String],
    references: &[String],
) -> Vec<EvalRecord> {
    outputs
        .iter()
        .enumerate()
        .map(|(i, output)| EvalRecord {
            system_output: output.clone(),
            source: sources.get(i).cloned().unwrap_or_default(),
            reference: Some(references.get(i).cloned().unwrap_or_default()),
            context: None,
        })
        .collect()
}

/// Build dialogue-task records, one per output. Missing entries in the
/// companion slices become empty strings.
pub fn dialogue_records(
    outputs: &[String],
    sources: &[String],
    contexts: &[String],
) -> Vec<EvalRecord> {
    outputs
        .iter()
        .enumerate()
        .map(|(i, output)| EvalRecord {
            system_output: output.clone(),
            source: sources.get(i).cloned().unwrap_or_default(),
            reference: None,
            context: Some(contexts.get(i).cloned().unwrap_or_default()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarization_records_default_to_empty_companions() {
        let records = summarization_records(&["a summary".to_string()], &[], &[]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].system_output, "a summary");
        assert_eq!(records[0].source, "");
        assert_eq!(records[0].reference.as_deref(), Some(""));
        assert!(records[0].context.is_none());
    }

    #[test]
    fn test_dialogue_records_default_to_empty_companions() {
        let records = dialogue_records(&["a reply".to_string()], &[], &[]);
        assert_eq!(records[0].source, "");
        assert_eq!(records[0].context.as_deref(), Some(""));
        assert!(records[0].reference.is_none());
    }

    #[test]
    fn test_companion_slices_are_zipped() {
        let outputs = vec!["x".to_string(), "y".to_string()];
        let sources = vec!["src".to_string()];
        let records = dialogue_records(&outputs, &sources, &[]);
        assert_eq!(records[0].source, "src");
        assert_eq!(records[1].source, "");
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let record = &summarization_records(&["out".to_string()], &[], &[])[0];
        let json = serde_json::to_value(record).unwrap();
        assert!(json.get("reference").is_some());
        assert!(json.get("context").is_none());
    }
}
