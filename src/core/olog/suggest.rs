use serde::Serialize;

use super::model::SpecModel;
use super::types::{Category, StructuredAttributeSet};
use crate::utils::text::{contains_phrase, tokenize};

const PREFERENCE_WEIGHT: u32 = 2;
const TRIGGER_WEIGHT: u32 = 1;
const MAX_ALTERNATIVES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: u32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub primary: Option<Category>,
    pub alternatives: Vec<Category>,
    /// Every declared category, best first.
    pub scores: Vec<CategoryScore>,
    pub reasoning: String,
}

/// Rank the model's categories for a description.
///
/// Each satisfied `prefers` clause scores 2, each trigger phrase found in the
/// text scores 1. Ties keep declaration order.
pub fn suggest_category(
    text: &str,
    attributes: &StructuredAttributeSet,
    model: &SpecModel,
) -> Suggestion {
    let tokens = tokenize(text);

    let mut scores: Vec<CategoryScore> = model
        .profiles()
        .iter()
        .map(|profile| {
            let mut score = 0;
            let mut reasons = Vec::new();
            for clause in &profile.prefers {
                if let Some(value) = attributes.get(clause.axis)
                    && clause.values.contains(value)
                {
                    score += PREFERENCE_WEIGHT;
                    reasons.push(format!("{} `{value}` suits {}", clause.axis, profile.category));
                }
            }
            for trigger in &profile.triggers {
                if contains_phrase(&tokens, &tokenize(trigger)) {
                    score += TRIGGER_WEIGHT;
                    reasons.push(format!("mentions `{trigger}`"));
                }
            }
            CategoryScore {
                category: profile.category,
                score,
                reasons,
            }
        })
        .collect();
    // stable: equal scores stay in declaration order
    scores.sort_by(|a, b| b.score.cmp(&a.score));

    let primary = scores.first().map(|s| s.category);
    let alternatives = scores
        .iter()
        .skip(1)
        .take(MAX_ALTERNATIVES)
        .map(|s| s.category)
        .collect();
    let reasoning = match scores.first() {
        Some(best) if !best.reasons.is_empty() => best.reasons.join("; "),
        _ => "general compatibility".to_string(),
    };

    tracing::debug!(primary = ?primary, "category suggested");
    Suggestion {
        primary,
        alternatives,
        scores,
        reasoning,
    }
}
