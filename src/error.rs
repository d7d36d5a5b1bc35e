use std::path::PathBuf;

use thiserror::Error;

use crate::core::olog::{AttributeAxis, AxisValue, Category};

// ─── Specification errors ────────────────────────────────────────────────────

/// A malformed or internally inconsistent olog document.
///
/// Every variant names the offending section and item so the author can find
/// it without re-reading the whole document.
#[derive(Debug, Error)]
pub enum SpecFormatError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", format_line(*line))]
    Parse { line: Option<usize>, message: String },

    #[error("missing required section `{0}`")]
    MissingSection(&'static str),

    #[error("{section}: `{name}` is not a known attribute axis")]
    UnknownAxis { section: String, name: String },

    #[error("{section}: attribute axis `{axis}` has no declared domain")]
    UndefinedDomain { section: String, axis: String },

    #[error("types.{axis}: {message}")]
    InvalidDomain { axis: String, message: String },

    #[error("{section}: `{name}` is not a declared category")]
    UnknownCategory { section: String, name: String },

    #[error("types.category: category `{0}` is declared more than once")]
    DuplicateCategory(String),

    #[error("{section}: `{value}` is not an instance of `{axis}`")]
    UnknownValue {
        section: String,
        axis: String,
        value: String,
    },

    #[error("morphisms.{rule}: {message}")]
    InvalidRule { rule: String, message: String },

    #[error("morphisms.{rule}: parameter `{param}`: {message}")]
    InvalidParameter {
        rule: String,
        param: String,
        message: String,
    },

    #[error(
        "morphisms: `{second}` overlaps `{first}` on {category}/{axis} value `{value}`; exact patterns may not overlap"
    )]
    ConflictingRules {
        category: String,
        axis: String,
        first: String,
        second: String,
        value: String,
    },

    #[error("commutative_diagrams.{constraint}: {message}")]
    InvalidAssertion { constraint: String, message: String },
}

fn format_line(line: Option<usize>) -> String {
    line.map_or_else(|| "unknown".to_string(), |l| l.to_string())
}

impl SpecFormatError {
    pub(crate) fn from_yaml(err: &serde_yaml::Error) -> Self {
        Self::Parse {
            line: err.location().map(|l| l.line()),
            message: err.to_string(),
        }
    }
}

// ─── Request errors ──────────────────────────────────────────────────────────

/// The requested category is not part of the loaded model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category `{requested}` (available: {})", format_categories(.available))]
pub struct UnknownCategoryError {
    pub requested: String,
    pub available: Vec<Category>,
}

fn format_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(Category::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A caller-supplied rule parameter lies outside the rule's declared range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parameter `{param}` = {value} is outside [{min}, {max}] declared by rule `{rule}`")]
pub struct ParameterRangeError {
    pub rule: String,
    pub param: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// A request the engine refuses to run.
///
/// Load-time problems are [`SpecFormatError`]s instead. Coherence violations
/// are never errors; the checker reports them as data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategoryError),

    #[error(transparent)]
    ParameterRange(#[from] ParameterRangeError),

    /// `allowed` is empty when the olog declares no domain for `axis`.
    #[error("`{value}` is not an instance of `{axis}` ({})", format_allowed(.allowed))]
    InvalidAttribute {
        axis: AttributeAxis,
        value: String,
        allowed: Vec<AxisValue>,
    },

    #[error("variant count must be between 1 and {max}, got {requested}")]
    VariantCount { requested: usize, max: usize },
}

fn format_allowed(allowed: &[AxisValue]) -> String {
    if allowed.is_empty() {
        return "the olog declares no domain for this axis".to_string();
    }
    let names: Vec<&str> = allowed.iter().map(AxisValue::as_str).collect();
    format!("allowed: {}", names.join(", "))
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
