use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::types::{
    AttributeAxis, Category, EffectiveParams, ParamSpec, StyleParams, TransformationRule,
};
use crate::error::ParameterRangeError;

/// Transformation rules indexed by `(category, axis)`.
///
/// Built once per model. Each bucket keeps declaration order, which is the
/// evaluation order.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    index: HashMap<(Category, AttributeAxis), Vec<Arc<TransformationRule>>>,
    declared: Vec<Arc<TransformationRule>>,
}

impl RuleRegistry {
    pub fn new(rules: impl IntoIterator<Item = TransformationRule>) -> Self {
        let mut registry = Self::default();
        for rule in rules {
            let rule = Arc::new(rule);
            registry
                .index
                .entry((rule.category, rule.axis))
                .or_default()
                .push(Arc::clone(&rule));
            registry.declared.push(rule);
        }
        registry
    }

    /// Rules for one `(category, axis)` pair, in declaration order.
    pub fn rules_for(
        &self,
        category: Category,
        axis: AttributeAxis,
    ) -> &[Arc<TransformationRule>] {
        self.index
            .get(&(category, axis))
            .map_or(&[][..], Vec::as_slice)
    }

    /// All rules of one category, in declaration order.
    pub fn rules_in(&self, category: Category) -> Vec<Arc<TransformationRule>> {
        self.declared
            .iter()
            .filter(|rule| rule.category == category)
            .cloned()
            .collect()
    }

    pub fn has_rules(&self, category: Category) -> bool {
        self.index.keys().any(|(c, _)| *c == category)
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

/// Merge caller overrides onto a rule's parameter defaults.
///
/// Only parameters the rule declares are taken from `caller`; anything else
/// the caller passes belongs to other rules and is ignored here. A supplied
/// value outside the declared range (or NaN) is rejected.
pub fn resolve_parameters(
    rule: &str,
    caller: &StyleParams,
    defaults: &BTreeMap<String, ParamSpec>,
) -> Result<EffectiveParams, ParameterRangeError> {
    defaults
        .iter()
        .map(|(name, spec)| {
            let value = caller.get(name).copied().unwrap_or(spec.default);
            if spec.range.contains(value) {
                Ok((name.clone(), value))
            } else {
                Err(ParameterRangeError {
                    rule: rule.to_string(),
                    param: name.clone(),
                    value,
                    min: spec.range.min,
                    max: spec.range.max,
                })
            }
        })
        .collect()
}
