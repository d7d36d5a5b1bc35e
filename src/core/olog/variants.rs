use serde::Serialize;

use super::model::SpecModel;
use super::pipeline::transform;
use super::types::{StructuredAttributeSet, StyleParams, TransformationResult};
use crate::error::TransformError;

/// A named set of style parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub energy_level: f64,
    pub composition_density: f64,
}

impl Preset {
    pub fn params(&self) -> StyleParams {
        StyleParams::from([
            ("energy_level".to_string(), self.energy_level),
            ("composition_density".to_string(), self.composition_density),
        ])
    }
}

pub const PRESETS: [Preset; 5] = [
    Preset { name: "Subtle", energy_level: 0.5, composition_density: 0.4 },
    Preset { name: "Balanced", energy_level: 0.75, composition_density: 0.7 },
    Preset { name: "Intense", energy_level: 1.0, composition_density: 1.0 },
    Preset { name: "Vintage", energy_level: 0.6, composition_density: 0.5 },
    Preset { name: "Dramatic", energy_level: 0.9, composition_density: 0.8 },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub preset: &'static str,
    pub result: TransformationResult,
}

/// Transform `attributes` once per preset, in preset order.
pub fn generate_variants(
    attributes: &StructuredAttributeSet,
    category: &str,
    count: usize,
    model: &SpecModel,
) -> Result<Vec<Variant>, TransformError> {
    if !(1..=PRESETS.len()).contains(&count) {
        return Err(TransformError::VariantCount {
            requested: count,
            max: PRESETS.len(),
        });
    }
    PRESETS[..count]
        .iter()
        .map(|preset| {
            Ok(Variant {
                preset: preset.name,
                result: transform(attributes, category, &preset.params(), model)?,
            })
        })
        .collect()
}
