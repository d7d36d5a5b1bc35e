use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use super::extractor::AttributeExtractor;
use super::intent::Intentionality;
use super::registry::RuleRegistry;
use super::types::{
    AttributeAxis, AttributeDomain, Category, CategoryProfile, CoherenceConstraint,
    StructuredAttributeSet,
};
use crate::error::{TransformError, UnknownCategoryError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpecMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// The loaded, validated olog.
///
/// Immutable once built; share it behind an `Arc`. The rule registry and the
/// keyword extractor are derived from it at load time so requests never
/// rebuild them.
#[derive(Debug)]
pub struct SpecModel {
    pub(crate) metadata: SpecMetadata,
    pub(crate) domains: BTreeMap<AttributeAxis, AttributeDomain>,
    pub(crate) categories: Vec<CategoryProfile>,
    pub(crate) constraints: Vec<CoherenceConstraint>,
    pub(crate) registry: RuleRegistry,
    pub(crate) extractor: AttributeExtractor,
    pub(crate) intent: Option<Intentionality>,
    pub(crate) warnings: Vec<String>,
}

impl SpecModel {
    pub fn metadata(&self) -> &SpecMetadata {
        &self.metadata
    }

    pub fn domains(&self) -> &BTreeMap<AttributeAxis, AttributeDomain> {
        &self.domains
    }

    pub fn domain(&self, axis: AttributeAxis) -> Option<&AttributeDomain> {
        self.domains.get(&axis)
    }

    pub fn axes(&self) -> impl Iterator<Item = AttributeAxis> + '_ {
        self.domains.keys().copied()
    }

    /// Declared categories, in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().map(|p| p.category)
    }

    pub fn profiles(&self) -> &[CategoryProfile] {
        &self.categories
    }

    pub fn profile(&self, category: Category) -> Option<&CategoryProfile> {
        self.categories.iter().find(|p| p.category == category)
    }

    /// Resolve a caller-supplied category name against this model.
    pub fn resolve_category(&self, name: &str) -> Result<&CategoryProfile, UnknownCategoryError> {
        Category::from_str(name.trim())
            .ok()
            .and_then(|c| self.profile(c))
            .ok_or_else(|| UnknownCategoryError {
                requested: name.to_string(),
                available: self.categories().collect(),
            })
    }

    /// Reject any value that is not an instance of its axis domain, and any
    /// axis this model declares no domain for.
    ///
    /// Sets can be built or deserialized outside the extractor, so every
    /// request entry point runs this before touching rules.
    pub fn validate_attributes(
        &self,
        attributes: &StructuredAttributeSet,
    ) -> Result<(), TransformError> {
        for (axis, value) in attributes.iter() {
            let Some(domain) = self.domain(axis) else {
                return Err(TransformError::InvalidAttribute {
                    axis,
                    value: value.to_string(),
                    allowed: Vec::new(),
                });
            };
            if !domain.contains(value.as_str()) {
                return Err(TransformError::InvalidAttribute {
                    axis,
                    value: value.to_string(),
                    allowed: domain.instances.iter().map(|i| i.name.clone()).collect(),
                });
            }
        }
        Ok(())
    }

    pub fn constraints(&self) -> &[CoherenceConstraint] {
        &self.constraints
    }

    pub fn constraints_for(
        &self,
        category: Category,
    ) -> impl Iterator<Item = &CoherenceConstraint> {
        self.constraints.iter().filter(move |c| c.category == category)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn extractor(&self) -> &AttributeExtractor {
        &self.extractor
    }

    pub fn intentionality(&self) -> Option<&Intentionality> {
        self.intent.as_ref()
    }

    /// Non-fatal findings from the load-time validation pass.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
