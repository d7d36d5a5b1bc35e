//! Raw, unvalidated shape of an olog YAML document.
//!
//! Everything here mirrors the file one-to-one and keeps names as strings.
//! The loader turns it into the typed model and rejects anything that does
//! not resolve.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub(crate) struct OlogFile {
    pub olog: Option<RawOlog>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawOlog {
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    // Mappings keep declaration order; the typed model relies on it.
    pub types: Option<serde_yaml::Mapping>,
    pub morphisms: Option<Vec<RawMorphism>>,
    pub commutative_diagrams: Option<serde_yaml::Mapping>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<serde_yaml::Value>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawType {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub instances: Vec<RawInstance>,
}

/// `- low` or `- { name: high, keywords: [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawInstance {
    Name(String),
    Detailed(RawInstanceSpec),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawInstanceSpec {
    pub name: String,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Entries of `types.category.instances`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCategory {
    Name(String),
    Detailed(RawCategorySpec),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCategorySpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub axes: Option<Vec<String>>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub prefers: BTreeMap<String, RawValues>,
    #[serde(default)]
    pub emphasis: Vec<String>,
    #[serde(default)]
    pub markers: Vec<String>,
    #[serde(default)]
    pub avoid: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCategoryType {
    #[serde(default)]
    pub instances: Vec<RawCategory>,
}

/// `high`, `medium|high`, or `[medium, high]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawValues {
    One(String),
    Many(Vec<String>),
}

impl RawValues {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => s.split('|').map(|v| v.trim().to_string()).collect(),
            Self::Many(values) => values.into_iter().map(|v| v.trim().to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMorphism {
    pub name: String,
    pub category: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub when: Option<RawPattern>,
    pub output: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, RawParameter>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPattern {
    Parameter(RawParamPredicate),
    Values(RawValues),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawParamPredicate {
    pub param: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawParameter {
    pub default: f64,
    #[serde(default = "default_param_min")]
    pub min: f64,
    #[serde(default = "default_param_max")]
    pub max: f64,
}

fn default_param_min() -> f64 {
    0.0
}
fn default_param_max() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDiagram {
    pub category: String,
    pub assertion: String,
    #[serde(default)]
    pub paths: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
}
