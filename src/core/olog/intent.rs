//! Secondary intentionality document: the human-readable "why" behind each
//! category. Nothing in the transformation path reads it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::types::{Category, CategoryProfile};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIntent {
    #[serde(default)]
    pub core_intention: Option<String>,
    #[serde(default)]
    pub composition_principle: Option<String>,
    #[serde(default)]
    pub why_this_works: Option<String>,
    #[serde(default)]
    pub commercial_promise: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Intentionality {
    pub name: Option<String>,
    pub by_category: BTreeMap<Category, CategoryIntent>,
}

#[derive(Debug, Deserialize)]
struct IntentFile {
    olog: IntentOlog,
}

#[derive(Debug, Deserialize)]
struct IntentOlog {
    #[serde(default)]
    metadata: Option<IntentMetadata>,
    #[serde(default)]
    instances: BTreeMap<String, CategoryIntent>,
}

#[derive(Debug, Deserialize)]
struct IntentMetadata {
    #[serde(default)]
    name: Option<String>,
}

impl Intentionality {
    /// Parse an intentionality document. Entries for names that are not
    /// categories are skipped with a warning.
    pub fn parse(document: &str) -> Result<Self, serde_yaml::Error> {
        let file: IntentFile = serde_yaml::from_str(document)?;
        let mut by_category = BTreeMap::new();
        for (name, intent) in file.olog.instances {
            match Category::from_str(&name) {
                Ok(category) => {
                    by_category.insert(category, intent);
                }
                Err(_) => {
                    tracing::warn!(
                        name = %name,
                        "intentionality entry for unknown category skipped"
                    );
                }
            }
        }
        Ok(Self {
            name: file.olog.metadata.and_then(|m| m.name),
            by_category,
        })
    }

    pub fn get(&self, category: Category) -> Option<&CategoryIntent> {
        self.by_category.get(&category)
    }
}

/// Answer to `explain`: the category's declared profile plus its rationale,
/// when an intentionality document was available.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub category: Category,
    pub description: Option<String>,
    pub markers: Vec<String>,
    pub intent: Option<CategoryIntent>,
}

impl Explanation {
    pub(crate) fn new(profile: &CategoryProfile, intent: Option<&CategoryIntent>) -> Self {
        Self {
            category: profile.category,
            description: profile.description.clone(),
            markers: profile.markers.clone(),
            intent: intent.cloned(),
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.category)?;
        if let Some(description) = &self.description {
            writeln!(f, "  {description}")?;
        }
        match &self.intent {
            Some(intent) => {
                let fields = [
                    ("core intention", &intent.core_intention),
                    ("composition principle", &intent.composition_principle),
                    ("why this works", &intent.why_this_works),
                    ("commercial promise", &intent.commercial_promise),
                ];
                for (label, value) in fields {
                    if let Some(value) = value {
                        writeln!(f, "  {label}: {}", value.trim())?;
                    }
                }
            }
            None => writeln!(f, "  (no intentionality recorded)")?,
        }
        if !self.markers.is_empty() {
            writeln!(f, "  markers: {}", self.markers.join(", "))?;
        }
        Ok(())
    }
}
