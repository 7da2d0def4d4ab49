//! Operator discovery.
//!
//! An explicit factory map owned by the pipeline driver. Operators are
//! registered under stable names and constructed on demand from shared
//! parameters.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::UniEvalConfig;
use crate::error::OperatorError;
use crate::operators::{MetricSelection, Operator, UniEvalScorer};
use crate::unieval::{Device, HttpEvaluatorProvider};

/// Parameters operator factories build from.
#[derive(Debug, Clone)]
pub struct OperatorParams {
    pub unieval: UniEvalConfig,
    pub metrics: MetricSelection,
    pub device: Device,
}

type Factory = Box<dyn Fn(&OperatorParams) -> Arc<dyn Operator> + Send + Sync>;

/// Factory map for operators.
pub struct OperatorRegistry {
    factories: BTreeMap<String, Factory>,
}

impl OperatorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with every built-in operator registered.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(UniEvalScorer::NAME, |params| {
            let provider = Arc::new(HttpEvaluatorProvider::new(params.unieval.clone()));
            Arc::new(UniEvalScorer::new(
                params.metrics,
                params.device.clone(),
                provider,
            ))
        });
        registry
    }

    /// Register a factory under `name`. A later registration under the same
    /// name replaces the earlier one.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&OperatorParams) -> Arc<dyn Operator> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// Construct the operator registered under `name`.
    pub fn build(
        &self,
        name: &str,
        params: &OperatorParams,
    ) -> Result<Arc<dyn Operator>, OperatorError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| OperatorError::UnknownOperator {
                name: name.to_string(),
            })?;
        Ok(factory(params))
    }

    /// Registered operator names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> OperatorParams {
        OperatorParams {
            unieval: UniEvalConfig::default(),
            metrics: MetricSelection::default(),
            device: Device::cpu(),
        }
    }

    #[test]
    fn test_builtin_registry_lists_scorer() {
        let registry = OperatorRegistry::builtin();
        assert_eq!(registry.names(), vec![UniEvalScorer::NAME]);
    }

    #[test]
    fn test_build_by_name() {
        let registry = OperatorRegistry::builtin();
        let operator = registry.build(UniEvalScorer::NAME, &params()).unwrap();
        assert_eq!(operator.name(), UniEvalScorer::NAME);
    }

    #[test]
    fn test_build_unknown_name_errors() {
        let registry = OperatorRegistry::builtin();
        let result = registry.build("no_such_operator", &params());
        assert!(matches!(result, Err(OperatorError::UnknownOperator { .. })));
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = OperatorRegistry::builtin();
        registry.register(UniEvalScorer::NAME, |params| {
            let provider = Arc::new(HttpEvaluatorProvider::new(params.unieval.clone()));
            Arc::new(UniEvalScorer::new(
                MetricSelection::all(),
                params.device.clone(),
                provider,
            ))
        });
        assert_eq!(registry.names().len(), 1);
    }
}
