use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;

use super::assertion::{AssertionShape, RawClause, parse_assertion};
use super::document::{
    OlogFile, RawCategory, RawCategorySpec, RawCategoryType, RawDiagram, RawInstance,
    RawMetadata, RawMorphism, RawPattern, RawType, RawValues,
};
use super::extractor::AttributeExtractor;
use super::intent::Intentionality;
use super::model::{SpecMetadata, SpecModel};
use super::registry::RuleRegistry;
use super::types::{
    AttributeAxis, AttributeDomain, AxisValue, Category, CategoryProfile, Clause,
    CoherenceConstraint, ConstraintKind, InputPattern, Instance, ParamRange, ParamSpec,
    TransformationRule,
};
use crate::error::SpecFormatError;

const CATEGORY_TYPE: &str = "category";

/// Where the loader looks for the intentionality document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IntentSource {
    /// `<stem>_intentionality.<ext>` next to the olog.
    #[default]
    Discover,
    Path(PathBuf),
    Disabled,
}

/// Reads olog documents from disk and builds validated models.
#[derive(Debug, Clone, Default)]
pub struct SpecLoader {
    intent: IntentSource,
}

impl SpecLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intentionality(mut self, path: impl Into<PathBuf>) -> Self {
        self.intent = IntentSource::Path(path.into());
        self
    }

    pub fn without_intentionality(mut self) -> Self {
        self.intent = IntentSource::Disabled;
        self
    }

    /// Intentionality document that would accompany `spec_path`, if any.
    pub fn intentionality_path(&self, spec_path: &Path) -> Option<PathBuf> {
        match &self.intent {
            IntentSource::Discover => Some(intentionality_sibling(spec_path)),
            IntentSource::Path(path) => Some(path.clone()),
            IntentSource::Disabled => None,
        }
    }

    pub fn load_path(&self, path: &Path) -> Result<SpecModel, SpecFormatError> {
        let document = std::fs::read_to_string(path).map_err(|source| SpecFormatError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut model = parse_spec(&document)?;
        model.intent = self.load_intentionality(path);

        for warning in &model.warnings {
            tracing::warn!(path = %path.display(), "{warning}");
        }
        tracing::info!(
            path = %path.display(),
            axes = model.domains.len(),
            categories = model.categories.len(),
            rules = model.registry.len(),
            constraints = model.constraints.len(),
            intentionality = model.intent.is_some(),
            "olog loaded"
        );
        Ok(model)
    }

    fn load_intentionality(&self, spec_path: &Path) -> Option<Intentionality> {
        let path = self.intentionality_path(spec_path)?;
        let document = match std::fs::read_to_string(&path) {
            Ok(document) => document,
            Err(e) => {
                if self.intent != IntentSource::Discover {
                    tracing::warn!(
                        path = %path.display(),
                        "intentionality document unreadable: {e}"
                    );
                }
                return None;
            }
        };
        match Intentionality::parse(&document) {
            Ok(intent) => Some(intent),
            Err(e) => {
                tracing::warn!(path = %path.display(), "intentionality document ignored: {e}");
                None
            }
        }
    }
}

/// `styles.olog.yaml` -> `styles_intentionality.olog.yaml`
pub fn intentionality_sibling(spec_path: &Path) -> PathBuf {
    let file_name = spec_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sibling = match file_name.split_once('.') {
        Some((stem, ext)) => format!("{stem}_intentionality.{ext}"),
        None => format!("{file_name}_intentionality"),
    };
    spec_path.with_file_name(sibling)
}

/// Parse and validate an olog document. Pure: no I/O, no intentionality.
pub fn parse_spec(document: &str) -> Result<SpecModel, SpecFormatError> {
    let file: OlogFile =
        serde_yaml::from_str(document).map_err(|e| SpecFormatError::from_yaml(&e))?;
    let olog = file.olog.ok_or(SpecFormatError::MissingSection("olog"))?;
    let types = olog.types.ok_or(SpecFormatError::MissingSection("types"))?;
    let morphisms = olog
        .morphisms
        .ok_or(SpecFormatError::MissingSection("morphisms"))?;
    let diagrams = olog
        .commutative_diagrams
        .ok_or(SpecFormatError::MissingSection("commutative_diagrams"))?;

    let mut domains = BTreeMap::new();
    let mut category_type = None;
    for (key, value) in types {
        let name = mapping_key(&key, "types")?;
        if name == CATEGORY_TYPE {
            category_type = Some(from_value::<RawCategoryType>(value, "types.category")?);
            continue;
        }
        let axis = AttributeAxis::from_str(&name).map_err(|_| SpecFormatError::UnknownAxis {
            section: "types".into(),
            name: name.clone(),
        })?;
        let raw = from_value::<RawType>(value, &format!("types.{name}"))?;
        domains.insert(axis, build_domain(axis, raw)?);
    }
    let category_type = category_type.ok_or(SpecFormatError::MissingSection("types.category"))?;

    let categories = build_categories(category_type, &domains)?;
    let rules = build_rules(morphisms, &domains, &categories)?;
    let constraints = build_constraints(diagrams, &domains, &categories)?;

    let mut warnings = Vec::new();
    for profile in &categories {
        let has_rules = rules.iter().any(|r| r.category == profile.category);
        let has_constraints = constraints.iter().any(|c| c.category == profile.category);
        if !has_rules && !has_constraints {
            warnings.push(format!(
                "category `{}` declares no morphisms or commutative diagrams",
                profile.category
            ));
        }
    }
    for constraint in &constraints {
        let referenced = constraint.kind.axes();
        for unused in constraint.paths.difference(&referenced) {
            warnings.push(format!(
                "commutative diagram `{}` lists path `{unused}` its assertion never references",
                constraint.name
            ));
        }
    }

    let extractor = AttributeExtractor::new(&domains);
    Ok(SpecModel {
        metadata: build_metadata(olog.metadata.unwrap_or_default()),
        domains,
        categories,
        constraints,
        registry: RuleRegistry::new(rules),
        extractor,
        intent: None,
        warnings,
    })
}

fn mapping_key(key: &serde_yaml::Value, section: &str) -> Result<String, SpecFormatError> {
    key.as_str()
        .map(str::to_string)
        .ok_or_else(|| SpecFormatError::Parse {
            line: None,
            message: format!("{section}: keys must be strings, got {key:?}"),
        })
}

fn from_value<T: DeserializeOwned>(
    value: serde_yaml::Value,
    section: &str,
) -> Result<T, SpecFormatError> {
    serde_yaml::from_value(value).map_err(|e| SpecFormatError::Parse {
        line: e.location().map(|l| l.line()),
        message: format!("{section}: {e}"),
    })
}

fn build_metadata(raw: RawMetadata) -> SpecMetadata {
    let version = raw.version.and_then(|v| match v {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    SpecMetadata {
        name: raw.name,
        version,
        description: raw.description,
    }
}

fn valid_instance_name(name: &str) -> bool {
    !name.is_empty() && name != "*" && !name.contains(|c: char| c.is_whitespace() || c == '|')
}

fn build_domain(axis: AttributeAxis, raw: RawType) -> Result<AttributeDomain, SpecFormatError> {
    let invalid = |message: String| SpecFormatError::InvalidDomain {
        axis: axis.to_string(),
        message,
    };

    if raw.instances.is_empty() {
        return Err(invalid("declares no instances".into()));
    }

    let mut seen = HashSet::new();
    let mut instances = Vec::with_capacity(raw.instances.len());
    for raw_instance in raw.instances {
        let (name, keywords, description) = match raw_instance {
            RawInstance::Name(name) => (name.clone(), vec![name], None),
            RawInstance::Detailed(spec) => {
                let keywords = spec.keywords.unwrap_or_else(|| vec![spec.name.clone()]);
                (spec.name, keywords, spec.description)
            }
        };
        let name = name.trim().to_string();
        if !valid_instance_name(&name) {
            return Err(invalid(format!("`{name}` is not a valid instance name")));
        }
        if !seen.insert(name.clone()) {
            return Err(invalid(format!("instance `{name}` is declared more than once")));
        }
        instances.push(Instance {
            name: AxisValue::new(name),
            keywords,
            description,
        });
    }

    let default = raw
        .default
        .ok_or_else(|| invalid("no default instance declared".into()))?;
    let default = default.trim();
    if !seen.contains(default) {
        return Err(invalid(format!("default `{default}` is not one of its instances")));
    }

    Ok(AttributeDomain {
        axis,
        description: raw.description,
        instances,
        default: AxisValue::from(default),
    })
}

/// Resolve an axis name and require a declared domain for it.
fn resolve_axis<'d>(
    name: &str,
    section: &str,
    domains: &'d BTreeMap<AttributeAxis, AttributeDomain>,
) -> Result<&'d AttributeDomain, SpecFormatError> {
    let name = name.trim();
    let axis = AttributeAxis::from_str(name).map_err(|_| SpecFormatError::UnknownAxis {
        section: section.to_string(),
        name: name.to_string(),
    })?;
    domains
        .get(&axis)
        .ok_or_else(|| SpecFormatError::UndefinedDomain {
            section: section.to_string(),
            axis: name.to_string(),
        })
}

fn resolve_values(
    values: Vec<String>,
    domain: &AttributeDomain,
    section: &str,
) -> Result<Vec<AxisValue>, SpecFormatError> {
    values
        .into_iter()
        .map(|value| {
            domain
                .value(value.trim())
                .ok_or_else(|| SpecFormatError::UnknownValue {
                    section: section.to_string(),
                    axis: domain.axis.to_string(),
                    value,
                })
        })
        .collect()
}

fn resolve_category<'p>(
    name: &str,
    section: &str,
    categories: &'p [CategoryProfile],
) -> Result<&'p CategoryProfile, SpecFormatError> {
    let unknown = || SpecFormatError::UnknownCategory {
        section: section.to_string(),
        name: name.to_string(),
    };
    let category = Category::from_str(name.trim()).map_err(|_| unknown())?;
    categories
        .iter()
        .find(|p| p.category == category)
        .ok_or_else(unknown)
}

fn build_categories(
    raw: RawCategoryType,
    domains: &BTreeMap<AttributeAxis, AttributeDomain>,
) -> Result<Vec<CategoryProfile>, SpecFormatError> {
    if raw.instances.is_empty() {
        return Err(SpecFormatError::InvalidDomain {
            axis: CATEGORY_TYPE.into(),
            message: "declares no categories".into(),
        });
    }

    let mut profiles: Vec<CategoryProfile> = Vec::with_capacity(raw.instances.len());
    for entry in raw.instances {
        let spec = match entry {
            RawCategory::Name(name) => RawCategorySpec {
                name,
                description: None,
                axes: None,
                triggers: Vec::new(),
                prefers: BTreeMap::new(),
                emphasis: Vec::new(),
                markers: Vec::new(),
                avoid: Vec::new(),
            },
            RawCategory::Detailed(spec) => spec,
        };
        let name = spec.name.trim().to_string();
        let category =
            Category::from_str(&name).map_err(|_| SpecFormatError::UnknownCategory {
                section: "types.category".into(),
                name: name.clone(),
            })?;
        if profiles.iter().any(|p| p.category == category) {
            return Err(SpecFormatError::DuplicateCategory(name));
        }

        let section = format!("types.category.{name}");
        let axes: BTreeSet<AttributeAxis> = match spec.axes {
            Some(axes) => axes
                .iter()
                .map(|a| resolve_axis(a, &section, domains).map(|d| d.axis))
                .collect::<Result<_, _>>()?,
            None => domains.keys().copied().collect(),
        };

        let mut prefers = Vec::with_capacity(spec.prefers.len());
        for (axis_name, values) in spec.prefers {
            let domain = resolve_axis(&axis_name, &section, domains)?;
            prefers.push(Clause {
                axis: domain.axis,
                values: resolve_values(values.into_vec(), domain, &section)?,
            });
        }

        let emphasis = spec
            .emphasis
            .iter()
            .map(|a| resolve_axis(a, &section, domains).map(|d| d.axis))
            .collect::<Result<Vec<_>, _>>()?;

        profiles.push(CategoryProfile {
            category,
            axes,
            description: spec.description,
            triggers: spec.triggers,
            prefers,
            emphasis,
            markers: spec.markers,
            avoid: spec.avoid,
        });
    }
    Ok(profiles)
}

fn build_rules(
    morphisms: Vec<RawMorphism>,
    domains: &BTreeMap<AttributeAxis, AttributeDomain>,
    categories: &[CategoryProfile],
) -> Result<Vec<TransformationRule>, SpecFormatError> {
    let mut rules: Vec<TransformationRule> = Vec::with_capacity(morphisms.len());
    // (category, axis, value) -> first exact rule claiming it
    let mut exact_claims: HashMap<(Category, AttributeAxis, AxisValue), String> = HashMap::new();

    for raw in morphisms {
        let rule = build_rule(raw, domains, categories)?;
        if rules.iter().any(|r| r.name == rule.name) {
            return Err(SpecFormatError::InvalidRule {
                rule: rule.name,
                message: "rule name is declared more than once".into(),
            });
        }
        for value in rule.pattern.exact_values() {
            let key = (rule.category, rule.axis, value.clone());
            if let Some(first) = exact_claims.get(&key) {
                return Err(SpecFormatError::ConflictingRules {
                    category: rule.category.to_string(),
                    axis: rule.axis.to_string(),
                    first: first.clone(),
                    second: rule.name.clone(),
                    value: value.to_string(),
                });
            }
            exact_claims.insert(key, rule.name.clone());
        }
        rules.push(rule);
    }
    Ok(rules)
}

fn build_rule(
    raw: RawMorphism,
    domains: &BTreeMap<AttributeAxis, AttributeDomain>,
    categories: &[CategoryProfile],
) -> Result<TransformationRule, SpecFormatError> {
    let name = raw.name.trim().to_string();
    let section = format!("morphisms.{name}");
    let invalid = |message: String| SpecFormatError::InvalidRule {
        rule: name.clone(),
        message,
    };

    let profile = resolve_category(&raw.category, &section, categories)?;
    let source = resolve_axis(&raw.source, &section, domains)?;
    let target = resolve_axis(&raw.target, &section, domains)?;
    if source.axis != target.axis {
        return Err(invalid(format!(
            "source `{}` and target `{}` differ; cross-axis morphisms must be split into sequential rule sets",
            source.axis, target.axis
        )));
    }
    let domain = source;
    if !profile.axes.contains(&domain.axis) {
        return Err(invalid(format!(
            "axis `{}` is not declared for category `{}`",
            domain.axis, profile.category
        )));
    }

    let mut parameters = BTreeMap::new();
    for (param, spec) in raw.parameters {
        let range = ParamRange {
            min: spec.min,
            max: spec.max,
        };
        if range.min.is_nan() || range.max.is_nan() || range.min > range.max {
            return Err(SpecFormatError::InvalidParameter {
                rule: name.clone(),
                param,
                message: format!("invalid range {range}"),
            });
        }
        if !range.contains(spec.default) {
            return Err(SpecFormatError::InvalidParameter {
                rule: name.clone(),
                param,
                message: format!("default {} lies outside {range}", spec.default),
            });
        }
        parameters.insert(
            param,
            ParamSpec {
                default: spec.default,
                range,
            },
        );
    }

    let pattern = match raw.when {
        None => InputPattern::Any,
        Some(RawPattern::Values(RawValues::One(s))) if s.trim() == "*" => InputPattern::Any,
        Some(RawPattern::Values(values)) => InputPattern::OneOf {
            values: resolve_values(values.into_vec(), domain, &section)?,
        },
        Some(RawPattern::Parameter(predicate)) => {
            let Some(spec) = parameters.get(&predicate.param) else {
                return Err(invalid(format!(
                    "pattern reads parameter `{}` the rule does not declare",
                    predicate.param
                )));
            };
            InputPattern::Parameter {
                name: predicate.param,
                range: ParamRange {
                    min: predicate.min.unwrap_or(spec.range.min),
                    max: predicate.max.unwrap_or(spec.range.max),
                },
            }
        }
    };

    let output = domain
        .value(raw.output.trim())
        .ok_or_else(|| SpecFormatError::UnknownValue {
            section: section.clone(),
            axis: domain.axis.to_string(),
            value: raw.output.clone(),
        })?;

    Ok(TransformationRule {
        name: name.clone(),
        category: profile.category,
        axis: domain.axis,
        pattern,
        output,
        parameters,
        description: raw.description,
    })
}

fn build_constraints(
    diagrams: serde_yaml::Mapping,
    domains: &BTreeMap<AttributeAxis, AttributeDomain>,
    categories: &[CategoryProfile],
) -> Result<Vec<CoherenceConstraint>, SpecFormatError> {
    let mut constraints = Vec::with_capacity(diagrams.len());
    for (key, value) in diagrams {
        let name = mapping_key(&key, "commutative_diagrams")?;
        let section = format!("commutative_diagrams.{name}");
        let raw = from_value::<RawDiagram>(value, &section)?;
        constraints.push(build_constraint(name, &section, raw, domains, categories)?);
    }
    Ok(constraints)
}

fn build_constraint(
    name: String,
    section: &str,
    raw: RawDiagram,
    domains: &BTreeMap<AttributeAxis, AttributeDomain>,
    categories: &[CategoryProfile],
) -> Result<CoherenceConstraint, SpecFormatError> {
    let invalid = |message: String| SpecFormatError::InvalidAssertion {
        constraint: name.clone(),
        message,
    };

    let profile = resolve_category(&raw.category, section, categories)?;
    let parsed = parse_assertion(&raw.assertion).map_err(&invalid)?;

    let resolve_clauses = |clauses: Vec<RawClause>| -> Result<Vec<Clause>, SpecFormatError> {
        clauses
            .into_iter()
            .map(|clause| {
                let domain = resolve_axis(&clause.axis, section, domains)?;
                if !profile.axes.contains(&domain.axis) {
                    return Err(invalid(format!(
                        "axis `{}` is not declared for category `{}`",
                        domain.axis, profile.category
                    )));
                }
                Ok(Clause {
                    axis: domain.axis,
                    values: resolve_values(clause.values, domain, section)?,
                })
            })
            .collect()
    };
    let when = resolve_clauses(parsed.when)?;
    let then = resolve_clauses(parsed.then)?;
    let kind = match parsed.shape {
        AssertionShape::Implies => ConstraintKind::Implies { when, then },
        AssertionShape::Excludes => ConstraintKind::Excludes { when, then },
        AssertionShape::Requires => ConstraintKind::Requires { then },
    };

    let referenced = kind.axes();
    let paths = match raw.paths {
        Some(paths) => {
            let paths = paths
                .iter()
                .map(|p| resolve_axis(p, section, domains).map(|d| d.axis))
                .collect::<Result<BTreeSet<_>, _>>()?;
            if let Some(missing) = referenced.difference(&paths).next() {
                return Err(invalid(format!(
                    "assertion references `{missing}` which is not listed in paths"
                )));
            }
            paths
        }
        None => referenced,
    };

    Ok(CoherenceConstraint {
        name: name.clone(),
        category: profile.category,
        assertion: raw.assertion.trim().to_string(),
        kind,
        paths,
        description: raw.description,
    })
}
