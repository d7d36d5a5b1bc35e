//! Olog-driven aesthetic engine.
//!
//! An olog document declares attribute domains, categories (aesthetics),
//! per-category transformation rules and coherence constraints. The loader
//! validates it once into an immutable [`SpecModel`]; everything downstream
//! reads that model and never mutates it.

mod assertion;
pub mod cache;
pub mod checker;
pub(crate) mod document;
pub mod engine;
pub mod extractor;
pub mod intent;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod suggest;
pub mod types;
pub mod variants;

pub use cache::{DocumentSignature, SpecCache, SpecHandle};
pub use checker::CoherenceChecker;
pub use engine::{Application, TransformationEngine};
pub use extractor::{AttributeExtractor, Evidence, Extraction};
pub use intent::{CategoryIntent, Explanation, Intentionality};
pub use loader::{IntentSource, SpecLoader, intentionality_sibling, parse_spec};
pub use model::{SpecMetadata, SpecModel};
pub use pipeline::{
    CategoryRules, MetadataReport, category_rules, check, explain, extract_attributes,
    generate_variants, list_categories, load_spec, metadata, refine, suggest_category, transform,
};
pub use registry::{RuleRegistry, resolve_parameters};
pub use render::{RenderedDescription, RenderedSection, UNIVERSAL_NEGATIVES, render};
pub use suggest::{CategoryScore, Suggestion};
pub use types::*;
pub use variants::{PRESETS, Preset, Variant};
