use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString};

// Category: the closed set of aesthetics an olog may declare
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    MascotTheater,
    HealthHalo,
    NostalgiaRevival,
    PremiumDisruptor,
    KidChaos,
    TransparentHonest,
    AdventureFantasy,
}

// AttributeAxis: one dimension of a design (BTreeMap key, stable ordering)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttributeAxis {
    Subject,
    Action,
    Energy,
    Setting,
    Palette,
    Mood,
}

/// An instance name from an attribute domain.
///
/// Constructing one does not check membership. Anything caller-built is
/// checked by `SpecModel::validate_attributes` before rules or constraints
/// see it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisValue(String);

impl AxisValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AxisValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for AxisValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AxisValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// Instance: one admissible value plus the phrases that signal it in free text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub name: AxisValue,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Closed enumeration of admissible values for one axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDomain {
    pub axis: AttributeAxis,
    #[serde(default)]
    pub description: Option<String>,
    pub instances: Vec<Instance>,
    pub default: AxisValue,
}

impl AttributeDomain {
    pub fn contains(&self, value: &str) -> bool {
        self.instances.iter().any(|i| i.name == *value)
    }

    pub fn instance(&self, value: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.name == *value)
    }

    /// Look up `value` and hand back the canonical `AxisValue` for it.
    pub fn value(&self, value: &str) -> Option<AxisValue> {
        self.instance(value).map(|i| i.name.clone())
    }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A parameter a rule understands: its default and its valid range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub default: f64,
    pub range: ParamRange,
}

/// Caller-supplied parameter overrides, keyed by parameter name.
pub type StyleParams = BTreeMap<String, f64>;

/// Rule defaults with caller overrides merged on top.
pub type EffectiveParams = BTreeMap<String, f64>;

/// What a rule's current axis value has to look like for the rule to fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputPattern {
    Any,
    OneOf { values: Vec<AxisValue> },
    Parameter { name: String, range: ParamRange },
}

impl InputPattern {
    pub fn matches(&self, value: &AxisValue, params: &EffectiveParams) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf { values } => values.contains(value),
            Self::Parameter { name, range } => {
                params.get(name).is_some_and(|v| range.contains(*v))
            }
        }
    }

    pub fn exact_values(&self) -> &[AxisValue] {
        match self {
            Self::OneOf { values } => values,
            _ => &[],
        }
    }
}

impl fmt::Display for InputPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::OneOf { values } => {
                let joined = values
                    .iter()
                    .map(AxisValue::as_str)
                    .collect::<Vec<_>>()
                    .join("|");
                f.write_str(&joined)
            }
            Self::Parameter { name, range } => write!(f, "{name} in {range}"),
        }
    }
}

/// A morphism scoped to one category and one axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationRule {
    pub name: String,
    pub category: Category,
    pub axis: AttributeAxis,
    pub pattern: InputPattern,
    pub output: AxisValue,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamSpec>,
    #[serde(default)]
    pub description: Option<String>,
}

// ─── Constraints ─────────────────────────────────────────────────────────────

/// `axis = v1|v2`: holds when the axis currently carries one of the values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub axis: AttributeAxis,
    pub values: Vec<AxisValue>,
}

impl Clause {
    pub fn holds(&self, attributes: &StructuredAttributeSet) -> bool {
        attributes
            .get(self.axis)
            .is_some_and(|v| self.values.contains(v))
    }

    pub(crate) fn all_hold(clauses: &[Clause], attributes: &StructuredAttributeSet) -> bool {
        clauses.iter().all(|c| c.holds(attributes))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .values
            .iter()
            .map(AxisValue::as_str)
            .collect::<Vec<_>>()
            .join("|");
        write!(f, "{}={joined}", self.axis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintKind {
    /// If every `when` clause holds, every `then` clause must hold.
    Implies { when: Vec<Clause>, then: Vec<Clause> },
    /// `when` and `then` may not both hold.
    Excludes { when: Vec<Clause>, then: Vec<Clause> },
    /// Every `then` clause must hold.
    Requires { then: Vec<Clause> },
}

impl ConstraintKind {
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        let (when, then) = match self {
            Self::Implies { when, then } | Self::Excludes { when, then } => {
                (when.as_slice(), then.as_slice())
            }
            Self::Requires { then } => (&[][..], then.as_slice()),
        };
        when.iter().chain(then.iter())
    }

    pub fn axes(&self) -> BTreeSet<AttributeAxis> {
        self.clauses().map(|c| c.axis).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoherenceConstraint {
    pub name: String,
    pub category: Category,
    pub assertion: String,
    pub kind: ConstraintKind,
    pub paths: BTreeSet<AttributeAxis>,
    #[serde(default)]
    pub description: Option<String>,
}

// ─── Categories ──────────────────────────────────────────────────────────────

/// Declared shape of one category beyond its rules and constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub category: Category,
    pub axes: BTreeSet<AttributeAxis>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub prefers: Vec<Clause>,
    #[serde(default)]
    pub emphasis: Vec<AttributeAxis>,
    #[serde(default)]
    pub markers: Vec<String>,
    #[serde(default)]
    pub avoid: Vec<String>,
}

// ─── Per-request data ────────────────────────────────────────────────────────

/// One value per attribute axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredAttributeSet {
    values: BTreeMap<AttributeAxis, AxisValue>,
}

impl StructuredAttributeSet {
    pub fn get(&self, axis: AttributeAxis) -> Option<&AxisValue> {
        self.values.get(&axis)
    }

    pub fn axes(&self) -> impl Iterator<Item = AttributeAxis> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeAxis, &AxisValue)> {
        self.values.iter().map(|(axis, value)| (*axis, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace the value for `axis`. Unchecked; callers validate first.
    pub(crate) fn set(&mut self, axis: AttributeAxis, value: AxisValue) {
        self.values.insert(axis, value);
    }
}

impl FromIterator<(AttributeAxis, AxisValue)> for StructuredAttributeSet {
    fn from_iter<T: IntoIterator<Item = (AttributeAxis, AxisValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintOutcome {
    pub constraint: String,
    pub satisfied: bool,
    pub detail: String,
}

/// Record of a rule that fired during one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub rule: String,
    pub axis: AttributeAxis,
    pub from: AxisValue,
    pub to: AxisValue,
}

/// Final attribute set plus its coherence report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformationResult {
    category: Category,
    attributes: StructuredAttributeSet,
    applied: Vec<AppliedRule>,
    outcomes: Vec<ConstraintOutcome>,
    params: StyleParams,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    refined: Vec<AttributeAxis>,
}

impl TransformationResult {
    pub(crate) fn new(
        category: Category,
        attributes: StructuredAttributeSet,
        applied: Vec<AppliedRule>,
        outcomes: Vec<ConstraintOutcome>,
        params: StyleParams,
    ) -> Self {
        Self {
            category,
            attributes,
            applied,
            outcomes,
            params,
            refined: Vec::new(),
        }
    }

    /// Copy with `axis` pinned to `value` and fresh outcomes. Rules are not
    /// re-run, so `applied` still describes the original application.
    pub(crate) fn with_override(
        &self,
        axis: AttributeAxis,
        value: AxisValue,
        outcomes: Vec<ConstraintOutcome>,
    ) -> Self {
        let mut next = self.clone();
        next.attributes.set(axis, value);
        next.outcomes = outcomes;
        if !next.refined.contains(&axis) {
            next.refined.push(axis);
        }
        next
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn attributes(&self) -> &StructuredAttributeSet {
        &self.attributes
    }

    pub fn applied(&self) -> &[AppliedRule] {
        &self.applied
    }

    pub fn outcomes(&self) -> &[ConstraintOutcome] {
        &self.outcomes
    }

    /// Parameters the caller asked for (after config defaults were merged).
    pub fn params(&self) -> &StyleParams {
        &self.params
    }

    /// Axes pinned by hand after the rules ran, oldest first.
    pub fn refined(&self) -> &[AttributeAxis] {
        &self.refined
    }

    pub fn is_coherent(&self) -> bool {
        self.outcomes.iter().all(|o| o.satisfied)
    }

    pub fn violations(&self) -> impl Iterator<Item = &ConstraintOutcome> {
        self.outcomes.iter().filter(|o| !o.satisfied)
    }
}
