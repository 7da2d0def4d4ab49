//! Column-oriented table backed by JSON values.
//!
//! The shared table operators read and write. Columns keep first-seen order;
//! values are raw `serde_json::Value`s so score columns can hold nulls next
//! to numbers.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::StorageError;

/// In-memory tabular data, one `Vec<Value>` per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    data: HashMap<String, Vec<Value>>,
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Values of a column, if present.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.data.get(name).map(Vec::as_slice)
    }

    /// Longest column length. Appending into a column that already exists can
    /// leave columns uneven; nothing here re-checks that.
    pub fn n_rows(&self) -> usize {
        self.data.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Text values of a column. Strings pass through, null becomes the empty
    /// string, anything else serializes compactly.
    pub fn text_column(&self, name: &str) -> Option<Vec<String>> {
        let column = self.data.get(name)?;
        Some(
            column
                .iter()
                .map(|value| match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }

    /// Append `value` to column `name`, creating the column on first use.
    pub fn append_value(&mut self, name: &str, value: Value) {
        if !self.data.contains_key(name) {
            self.columns.push(name.to_string());
            self.data.insert(name.to_string(), Vec::new());
        }
        if let Some(column) = self.data.get_mut(name) {
            column.push(value);
        }
    }

    /// Parse a JSONL document, one JSON object per line. Blank lines are
    /// skipped; records missing a known key get a null in that column.
    pub fn from_jsonl(input: &str) -> Result<Self, StorageError> {
        let mut columns: Vec<String> = Vec::new();
        let mut data: HashMap<String, Vec<Value>> = HashMap::new();
        let mut n_rows = 0usize;

        for (idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: Value =
                serde_json::from_str(line).map_err(|e| StorageError::MalformedRecord {
                    line: idx + 1,
                    reason: e.to_string(),
                })?;
            let Value::Object(record) = value else {
                return Err(StorageError::MalformedRecord {
                    line: idx + 1,
                    reason: "expected a JSON object".to_string(),
                });
            };

            for (key, val) in record {
                if !data.contains_key(&key) {
                    columns.push(key.clone());
                    data.insert(key.clone(), vec![Value::Null; n_rows]);
                }
                if let Some(column) = data.get_mut(&key) {
                    column.push(val);
                }
            }
            n_rows += 1;
            for name in &columns {
                if let Some(column) = data.get_mut(name) {
                    if column.len() < n_rows {
                        column.push(Value::Null);
                    }
                }
            }
        }

        Ok(Self { columns, data })
    }

    /// Serialize as JSONL in column order. A row past a column's end skips
    /// that key.
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for row in 0..self.n_rows() {
            let mut record = serde_json::Map::new();
            for name in &self.columns {
                if let Some(value) = self.data.get(name).and_then(|c| c.get(row)) {
                    record.insert(name.clone(), value.clone());
                }
            }
            out.push_str(&Value::Object(record).to_string());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_jsonl_basic() {
        let input = r#"{"instruction": "write a poem", "output": "roses are red"}
{"instruction": "greet", "output": "hello"}
"#;
        let df = DataFrame::from_jsonl(input).unwrap();
        assert_eq!(df.n_rows(), 2);
        assert_eq!(df.columns(), &["instruction".to_string(), "output".to_string()]);
        assert_eq!(
            df.text_column("output").unwrap(),
            vec!["roses are red".to_string(), "hello".to_string()]
        );
    }

    #[test]
    fn test_from_jsonl_skips_blank_lines_and_pads_missing_keys() {
        let input = "{\"output\": \"a\"}\n\n{\"output\": \"b\", \"extra\": 1}\n";
        let df = DataFrame::from_jsonl(input).unwrap();
        assert_eq!(df.n_rows(), 2);
        assert_eq!(df.column("extra").unwrap(), &[Value::Null, Value::from(1)]);
    }

    #[test]
    fn test_from_jsonl_rejects_non_objects() {
        let err = DataFrame::from_jsonl("[1, 2, 3]\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_from_jsonl_reports_parse_line() {
        let err = DataFrame::from_jsonl("{\"a\": 1}\nnot json\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_append_value_creates_then_extends() {
        let mut df = DataFrame::new();
        assert!(!df.has_column("score"));

        df.append_value("score", Value::from(0.5));
        df.append_value("score", Value::Null);

        assert!(df.has_column("score"));
        assert_eq!(df.column("score").unwrap(), &[Value::from(0.5), Value::Null]);
        assert_eq!(df.columns(), &["score".to_string()]);
    }

    #[test]
    fn test_text_column_coerces_values() {
        let df = DataFrame::from_jsonl("{\"output\": 42}\n{\"output\": null}\n").unwrap();
        assert_eq!(
            df.text_column("output").unwrap(),
            vec!["42".to_string(), String::new()]
        );
        assert!(df.text_column("missing").is_none());
    }

    #[test]
    fn test_jsonl_round_trip() {
        let input = "{\"output\":\"a\",\"score\":0.5}\n{\"output\":\"b\",\"score\":null}\n";
        let df = DataFrame::from_jsonl(input).unwrap();
        let round = DataFrame::from_jsonl(&df.to_jsonl()).unwrap();
        assert_eq!(df, round);
    }
}
