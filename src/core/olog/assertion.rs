//! Textual coherence assertions.
//!
//! ```text
//! assertion := clauses "implies" clauses
//!            | clauses "excludes" clauses
//!            | ["requires"] clauses
//! clauses   := clause ("and" clause)*
//! clause    := axis "=" value ("|" value)*
//!            | axis "in" "{" value ("," value)* "}"
//! ```
//!
//! Keywords are case-insensitive; `->` is accepted for `implies`. Names are
//! left as strings here and resolved against the model by the loader.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AssertionShape {
    Implies,
    Excludes,
    Requires,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawClause {
    pub axis: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedAssertion {
    pub shape: AssertionShape,
    pub when: Vec<RawClause>,
    pub then: Vec<RawClause>,
}

pub(crate) fn parse_assertion(text: &str) -> Result<ParsedAssertion, String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Err("assertion is empty".into());
    }

    let operator = tokens.iter().enumerate().find_map(|(idx, tok)| {
        let lowered = tok.to_ascii_lowercase();
        match lowered.as_str() {
            "implies" | "->" => Some((idx, AssertionShape::Implies)),
            "excludes" => Some((idx, AssertionShape::Excludes)),
            _ => None,
        }
    });

    match operator {
        Some((idx, shape)) => {
            let when = parse_clauses(&tokens[..idx])?;
            let then = parse_clauses(&tokens[idx + 1..])?;
            Ok(ParsedAssertion { shape, when, then })
        }
        None => {
            let body = if tokens[0].eq_ignore_ascii_case("requires") {
                &tokens[1..]
            } else {
                &tokens[..]
            };
            Ok(ParsedAssertion {
                shape: AssertionShape::Requires,
                when: Vec::new(),
                then: parse_clauses(body)?,
            })
        }
    }
}

fn parse_clauses(tokens: &[&str]) -> Result<Vec<RawClause>, String> {
    if tokens.is_empty() {
        return Err("expected at least one `axis=value` clause".into());
    }
    tokens
        .split(|tok| tok.eq_ignore_ascii_case("and"))
        .map(|group| parse_clause(&group.join(" ")))
        .collect()
}

fn parse_clause(text: &str) -> Result<RawClause, String> {
    let (axis, values) = if let Some((axis, rest)) = text.split_once('=') {
        (axis, split_values(rest, '|'))
    } else if let Some((axis, rest)) = split_keyword(text, "in") {
        let inner = rest
            .trim()
            .trim_start_matches(['{', '['])
            .trim_end_matches(['}', ']']);
        (axis, split_values(inner, ','))
    } else {
        return Err(format!("clause `{text}` is not of the form `axis=value`"));
    };

    let axis = axis.trim();
    if axis.is_empty() || axis.contains(char::is_whitespace) {
        return Err(format!("clause `{text}` has an invalid axis name"));
    }
    if values.is_empty() || values.iter().any(|v| v.contains(char::is_whitespace)) {
        return Err(format!("clause `{text}` has an invalid value list"));
    }

    Ok(RawClause {
        axis: axis.to_string(),
        values,
    })
}

fn split_values(text: &str, sep: char) -> Vec<String> {
    text.split(sep)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_keyword<'a>(text: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let needle = format!(" {keyword} ");
    let lowered = text.to_ascii_lowercase();
    lowered
        .find(&needle)
        .map(|idx| (&text[..idx], &text[idx + needle.len()..]))
}
