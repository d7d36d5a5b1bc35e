/// Lowercased word tokens of `s`.
///
/// Anything that is not alphanumeric separates words, so `Sci-Fi` and
/// `sci fi` both tokenize to `["sci", "fi"]`.
pub fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `needle` occurs in `haystack` as a run of whole tokens.
pub fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// `hands_silhouette` -> `hands silhouette`
pub fn humanize(name: &str) -> String {
    name.replace('_', " ")
}
