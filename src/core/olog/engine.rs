use serde::Serialize;
use std::collections::BTreeMap;

use super::model::SpecModel;
use super::registry::resolve_parameters;
use super::types::{AppliedRule, EffectiveParams, StructuredAttributeSet, StyleParams};
use crate::error::TransformError;

/// Outcome of one rule application: the new set plus which rules fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub attributes: StructuredAttributeSet,
    pub applied: Vec<AppliedRule>,
}

/// Applies a category's rules to an attribute set.
///
/// Single pass. Every rule reads the *input* set and writes into a fresh one,
/// so no axis ever sees another axis's new value. Rules that need a cross-axis
/// dependency must run as two applications.
#[derive(Debug, Clone, Copy)]
pub struct TransformationEngine<'m> {
    model: &'m SpecModel,
}

impl<'m> TransformationEngine<'m> {
    pub fn new(model: &'m SpecModel) -> Self {
        Self { model }
    }

    pub fn apply(
        &self,
        attributes: &StructuredAttributeSet,
        category: &str,
        params: &StyleParams,
    ) -> Result<StructuredAttributeSet, TransformError> {
        Ok(self.apply_traced(attributes, category, params)?.attributes)
    }

    /// [`apply`](Self::apply), also reporting each rule that fired.
    pub fn apply_traced(
        &self,
        attributes: &StructuredAttributeSet,
        category: &str,
        params: &StyleParams,
    ) -> Result<Application, TransformError> {
        let category = self.model.resolve_category(category)?.category;
        self.model.validate_attributes(attributes)?;
        let registry = self.model.registry();

        // Resolve every rule's parameters up front so an out-of-range value
        // fails the request even if that rule would not have matched.
        let mut effective: BTreeMap<String, EffectiveParams> = BTreeMap::new();
        for rule in registry.rules_in(category) {
            let resolved = resolve_parameters(&rule.name, params, &rule.parameters)?;
            effective.insert(rule.name.clone(), resolved);
        }

        let mut output = StructuredAttributeSet::default();
        let mut applied = Vec::new();
        for (axis, current) in attributes.iter() {
            let fired = registry.rules_for(category, axis).iter().find(|rule| {
                effective
                    .get(&rule.name)
                    .is_some_and(|p| rule.pattern.matches(current, p))
            });
            match fired {
                Some(rule) => {
                    tracing::debug!(
                        rule = %rule.name,
                        axis = %axis,
                        from = %current,
                        to = %rule.output,
                        "rule applied"
                    );
                    applied.push(AppliedRule {
                        rule: rule.name.clone(),
                        axis,
                        from: current.clone(),
                        to: rule.output.clone(),
                    });
                    output.set(axis, rule.output.clone());
                }
                None => output.set(axis, current.clone()),
            }
        }

        Ok(Application {
            attributes: output,
            applied,
        })
    }
}
