use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::types::{AttributeAxis, AttributeDomain, AxisValue, StructuredAttributeSet};
use crate::utils::text::{contains_phrase, tokenize};

/// One keyword phrase and the value it signals.
#[derive(Debug, Clone)]
struct Phrase {
    tokens: Vec<String>,
    value: AxisValue,
}

/// Which phrase decided an axis, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub value: AxisValue,
    pub matched: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub attributes: StructuredAttributeSet,
    pub evidence: BTreeMap<AttributeAxis, Evidence>,
}

/// Keyword matcher over the declared attribute domains.
///
/// Phrases are pre-sorted longest first (by token count, then characters),
/// with declaration order breaking ties, so "chef knife" is tried before
/// "chef". Matching is on whole lowercase tokens; no partial-word hits.
#[derive(Debug, Default)]
pub struct AttributeExtractor {
    axes: BTreeMap<AttributeAxis, (AxisValue, Vec<Phrase>)>,
}

impl AttributeExtractor {
    pub fn new(domains: &BTreeMap<AttributeAxis, AttributeDomain>) -> Self {
        let axes = domains
            .iter()
            .map(|(axis, domain)| {
                let mut phrases: Vec<Phrase> = domain
                    .instances
                    .iter()
                    .flat_map(|instance| {
                        instance.keywords.iter().map(|kw| Phrase {
                            tokens: tokenize(kw),
                            value: instance.name.clone(),
                        })
                    })
                    .filter(|p| !p.tokens.is_empty())
                    .collect();
                // Stable sort keeps declaration order among equal lengths.
                phrases.sort_by_key(|p| {
                    (
                        Reverse(p.tokens.len()),
                        Reverse(p.tokens.iter().map(String::len).sum::<usize>()),
                    )
                });
                (*axis, (domain.default.clone(), phrases))
            })
            .collect();
        Self { axes }
    }

    pub fn extract(&self, text: &str) -> StructuredAttributeSet {
        self.extract_with_evidence(text).attributes
    }

    /// Like [`extract`](Self::extract), but also reports the phrase that
    /// decided each axis. Unmatched axes fall back to the domain default.
    pub fn extract_with_evidence(&self, text: &str) -> Extraction {
        let tokens = tokenize(text);
        let mut attributes = StructuredAttributeSet::default();
        let mut evidence = BTreeMap::new();

        for (axis, (default, phrases)) in &self.axes {
            let hit = phrases.iter().find(|p| contains_phrase(&tokens, &p.tokens));
            let (value, matched) = match hit {
                Some(phrase) => (phrase.value.clone(), Some(phrase.tokens.join(" "))),
                None => (default.clone(), None),
            };
            tracing::debug!(
                axis = %axis,
                value = %value,
                matched = matched.as_deref().unwrap_or("<default>"),
                "attribute extracted"
            );
            attributes.set(*axis, value.clone());
            evidence.insert(*axis, Evidence { value, matched });
        }

        Extraction {
            attributes,
            evidence,
        }
    }
}

/// One-shot extraction against a set of domains.
pub fn extract(
    text: &str,
    domains: &BTreeMap<AttributeAxis, AttributeDomain>,
) -> StructuredAttributeSet {
    AttributeExtractor::new(domains).extract(text)
}
