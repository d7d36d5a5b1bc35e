//! The programmatic surface an adapter (CLI, server, agent tool) calls.
//!
//! Every function here is a thin composition of the loader, extractor,
//! engine and checker; none holds state of its own.

use serde::Serialize;
use std::path::Path;

use super::checker::CoherenceChecker;
use super::engine::TransformationEngine;
use super::intent::Explanation;
use super::loader::SpecLoader;
use super::model::{SpecMetadata, SpecModel};
use super::types::{
    AttributeAxis, AxisValue, Category, CategoryProfile, CoherenceConstraint, ConstraintOutcome,
    StructuredAttributeSet, StyleParams, TransformationResult, TransformationRule,
};
use crate::error::{SpecFormatError, TransformError, UnknownCategoryError};

pub fn load_spec(path: &Path) -> Result<SpecModel, SpecFormatError> {
    SpecLoader::new().load_path(path)
}

/// Declared categories, in declaration order.
pub fn list_categories(model: &SpecModel) -> Vec<Category> {
    model.categories().collect()
}

pub fn extract_attributes(text: &str, model: &SpecModel) -> StructuredAttributeSet {
    model.extractor().extract(text)
}

/// Apply the category's rules, then check its constraints on the output.
///
/// Violations are reported in the result, never raised.
pub fn transform(
    attributes: &StructuredAttributeSet,
    category: &str,
    params: &StyleParams,
    model: &SpecModel,
) -> Result<TransformationResult, TransformError> {
    let application =
        TransformationEngine::new(model).apply_traced(attributes, category, params)?;
    let profile = model.resolve_category(category)?;
    let outcomes = CoherenceChecker::new(model).check(&application.attributes, category)?;

    let violations = outcomes.iter().filter(|o| !o.satisfied).count();
    tracing::info!(
        category = %profile.category,
        rules_applied = application.applied.len(),
        constraints = outcomes.len(),
        violations,
        "transformation complete"
    );
    Ok(TransformationResult::new(
        profile.category,
        application.attributes,
        application.applied,
        outcomes,
        params.clone(),
    ))
}

pub fn check(
    attributes: &StructuredAttributeSet,
    category: &str,
    model: &SpecModel,
) -> Result<Vec<ConstraintOutcome>, TransformError> {
    CoherenceChecker::new(model).check(attributes, category)
}

/// Pin one axis of an earlier result to a caller-chosen value.
///
/// The value must belong to the axis domain. Rules are not re-applied; only
/// the category's constraints are checked again against the edited set.
pub fn refine(
    result: &TransformationResult,
    axis: AttributeAxis,
    value: &str,
    model: &SpecModel,
) -> Result<TransformationResult, TransformError> {
    let category = result.category();
    let value = AxisValue::new(value.trim());
    let mut edited = result.attributes().clone();
    edited.set(axis, value.clone());
    let outcomes = CoherenceChecker::new(model).check(&edited, category.as_ref())?;

    let violations = outcomes.iter().filter(|o| !o.satisfied).count();
    tracing::info!(
        category = %category,
        axis = %axis,
        value = %value,
        violations,
        "component refined"
    );
    Ok(result.with_override(axis, value, outcomes))
}

/// Everything the model says about one category: its profile, its rules in
/// declaration order and its constraints.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRules {
    pub profile: CategoryProfile,
    pub rules: Vec<TransformationRule>,
    pub constraints: Vec<CoherenceConstraint>,
}

pub fn category_rules(
    category: &str,
    model: &SpecModel,
) -> Result<CategoryRules, UnknownCategoryError> {
    let profile = model.resolve_category(category)?;
    Ok(CategoryRules {
        profile: profile.clone(),
        rules: model
            .registry()
            .rules_in(profile.category)
            .into_iter()
            .map(|rule| TransformationRule::clone(&rule))
            .collect(),
        constraints: model.constraints_for(profile.category).cloned().collect(),
    })
}

/// Profile and rationale for a category. Lookup only.
pub fn explain(category: &str, model: &SpecModel) -> Result<Explanation, UnknownCategoryError> {
    let profile = model.resolve_category(category)?;
    let intent = model
        .intentionality()
        .and_then(|i| i.get(profile.category));
    Ok(Explanation::new(profile, intent))
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataReport {
    #[serde(flatten)]
    pub metadata: SpecMetadata,
    pub categories: Vec<Category>,
    pub axes: Vec<AttributeAxis>,
    pub rules: usize,
    pub constraints: usize,
    pub intentionality: bool,
}

pub fn metadata(model: &SpecModel) -> MetadataReport {
    MetadataReport {
        metadata: model.metadata().clone(),
        categories: list_categories(model),
        axes: model.axes().collect(),
        rules: model.registry().len(),
        constraints: model.constraints().len(),
        intentionality: model.intentionality().is_some(),
    }
}

pub use super::suggest::suggest_category;
pub use super::variants::generate_variants;
