use super::model::SpecModel;
use super::types::{
    AxisValue, Clause, CoherenceConstraint, ConstraintKind, ConstraintOutcome,
    StructuredAttributeSet,
};
use crate::error::TransformError;

/// Evaluates a category's coherence constraints against an attribute set.
///
/// A diagnostic, not a gate: violations come back as outcomes with
/// `satisfied == false`. Errors are reserved for malformed requests: a
/// category the model does not declare, or a value outside its domain.
#[derive(Debug, Clone, Copy)]
pub struct CoherenceChecker<'m> {
    model: &'m SpecModel,
}

impl<'m> CoherenceChecker<'m> {
    pub fn new(model: &'m SpecModel) -> Self {
        Self { model }
    }

    pub fn check(
        &self,
        attributes: &StructuredAttributeSet,
        category: &str,
    ) -> Result<Vec<ConstraintOutcome>, TransformError> {
        let category = self.model.resolve_category(category)?.category;
        self.model.validate_attributes(attributes)?;
        Ok(self
            .model
            .constraints_for(category)
            .map(|constraint| evaluate(constraint, attributes))
            .collect())
    }
}

/// Evaluate a single constraint. Pure over `attributes`.
pub fn evaluate(
    constraint: &CoherenceConstraint,
    attributes: &StructuredAttributeSet,
) -> ConstraintOutcome {
    let (satisfied, detail) = match &constraint.kind {
        ConstraintKind::Implies { when, then } => {
            if !Clause::all_hold(when, attributes) {
                (true, format!("not applicable: {}", observed(when, attributes)))
            } else if Clause::all_hold(then, attributes) {
                (true, format!("holds: {}", observed(then, attributes)))
            } else {
                (false, mismatches(then, attributes))
            }
        }
        ConstraintKind::Excludes { when, then } => {
            if Clause::all_hold(when, attributes) && Clause::all_hold(then, attributes) {
                (
                    false,
                    format!(
                        "{} together with {} is excluded",
                        observed(when, attributes),
                        observed(then, attributes)
                    ),
                )
            } else {
                (true, "holds: excluded combination absent".to_string())
            }
        }
        ConstraintKind::Requires { then } => {
            if Clause::all_hold(then, attributes) {
                (true, format!("holds: {}", observed(then, attributes)))
            } else {
                (false, mismatches(then, attributes))
            }
        }
    };

    if !satisfied {
        tracing::debug!(constraint = %constraint.name, detail = %detail, "constraint violated");
    }
    ConstraintOutcome {
        constraint: constraint.name.clone(),
        satisfied,
        detail,
    }
}

fn current(clause: &Clause, attributes: &StructuredAttributeSet) -> String {
    match attributes.get(clause.axis) {
        Some(value) => format!("{} is `{value}`", clause.axis),
        None => format!("{} is unset", clause.axis),
    }
}

fn observed(clauses: &[Clause], attributes: &StructuredAttributeSet) -> String {
    clauses
        .iter()
        .map(|c| current(c, attributes))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn mismatches(clauses: &[Clause], attributes: &StructuredAttributeSet) -> String {
    clauses
        .iter()
        .filter(|c| !c.holds(attributes))
        .map(|c| {
            let expected = c
                .values
                .iter()
                .map(AxisValue::as_str)
                .collect::<Vec<_>>()
                .join("|");
            format!("{} (expected {expected})", current(c, attributes))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
