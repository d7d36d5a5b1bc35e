use serde::Serialize;

use super::model::SpecModel;
use super::types::{AttributeAxis, AxisValue, Category, TransformationResult};
use crate::error::UnknownCategoryError;
use crate::utils::text::humanize;

/// Negative terms every rendering carries.
pub const UNIVERSAL_NEGATIVES: &[&str] = &[
    "blurry",
    "low quality",
    "distorted",
    "deformed",
    "watermark",
    "text overlay",
    "signature",
    "cropped",
    "out of frame",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub axis: AttributeAxis,
    pub value: AxisValue,
    pub phrase: String,
}

/// A transformation result turned back into free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDescription {
    pub category: Category,
    pub sections: Vec<RenderedSection>,
    pub markers: Vec<String>,
    pub negative: Vec<String>,
    pub text: String,
}

/// Render `result` in the category's emphasis order.
///
/// Emphasised axes come first, then the rest in axis order. Each value is
/// phrased by its instance description, or its humanized name when it has
/// none.
pub fn render(
    result: &TransformationResult,
    model: &SpecModel,
) -> Result<RenderedDescription, UnknownCategoryError> {
    let category = result.category();
    let profile = model.profile(category).ok_or_else(|| UnknownCategoryError {
        requested: category.to_string(),
        available: model.categories().collect(),
    })?;

    let attributes = result.attributes();
    let mut order: Vec<AttributeAxis> = profile
        .emphasis
        .iter()
        .copied()
        .filter(|axis| attributes.get(*axis).is_some())
        .collect();
    order.extend(attributes.axes().filter(|axis| !profile.emphasis.contains(axis)));

    let sections: Vec<RenderedSection> = order
        .into_iter()
        .filter_map(|axis| {
            let value = attributes.get(axis)?.clone();
            let phrase = model
                .domain(axis)
                .and_then(|d| d.instance(value.as_str()))
                .and_then(|i| i.description.clone())
                .unwrap_or_else(|| humanize(value.as_str()));
            Some(RenderedSection { axis, value, phrase })
        })
        .collect();

    let mut negative: Vec<String> = Vec::new();
    for term in UNIVERSAL_NEGATIVES
        .iter()
        .map(|t| (*t).to_string())
        .chain(profile.avoid.iter().cloned())
    {
        if !negative.contains(&term) {
            negative.push(term);
        }
    }

    let text = sections
        .iter()
        .map(|s| s.phrase.as_str())
        .chain(profile.markers.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(RenderedDescription {
        category,
        sections,
        markers: profile.markers.clone(),
        negative,
        text,
    })
}
