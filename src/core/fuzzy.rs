//! Fuzzy matching of user input against a list of known names.
//!
//! Resolution order:
//! 1. exact membership
//! 2. case-insensitive prefix (first candidate in list order)
//! 3. acronym-style subsequence match, earliest positions winning
//!
//! Used for generator names, generator sub-choices and command names.

use std::sync::LazyLock;

use regex::Regex;

/// Leading non-digit run followed by a number and whitespace, e.g. the
/// `Visual Studio ` in `Visual Studio 17 2022`.
static NUMBERED_FAMILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\D+)\d+\s").expect("valid regex"));

/// Resolve `query` to at most one candidate.
pub fn fuzzy_match<'a, S: AsRef<str>>(candidates: &'a [S], query: &str) -> Option<&'a str> {
    let names = || candidates.iter().map(|c| c.as_ref());

    if let Some(exact) = names().find(|c| *c == query) {
        return Some(exact);
    }

    let lower = query.to_lowercase();
    if let Some(prefixed) = names().find(|c| c.to_lowercase().starts_with(&lower)) {
        return Some(prefixed);
    }

    let upper = query.to_uppercase();
    let mut qualifying: Vec<(&str, Vec<usize>)> = names()
        .filter_map(|c| subsequence_positions(c, &upper).map(|p| (c, p)))
        .collect();

    if qualifying.is_empty() {
        qualifying = names()
            .filter_map(|c| subsequence_positions(&c.to_lowercase(), &lower).map(|p| (c, p)))
            .collect();
    }

    match qualifying.len() {
        0 => None,
        1 => Some(qualifying[0].0),
        _ => {
            // min_by keeps the first of equal elements, so list order breaks ties
            let (best, _) = qualifying.iter().min_by(|a, b| a.1.cmp(&b.1))?;
            let best = *best;

            if let Some(caps) = NUMBERED_FAMILY.captures(best) {
                let prefix = &caps[1];
                if let Some((head, _)) = qualifying.iter().find(|(c, _)| c.starts_with(prefix)) {
                    return Some(*head);
                }
            }

            Some(best)
        }
    }
}

/// Character positions at which `needle` occurs in `haystack` as a
/// subsequence, or `None` if it does not.
fn subsequence_positions(haystack: &str, needle: &str) -> Option<Vec<usize>> {
    let hay: Vec<char> = haystack.chars().collect();
    let mut positions = Vec::with_capacity(needle.len());
    let mut from = 0;

    for ch in needle.chars() {
        let offset = hay[from..].iter().position(|&h| h == ch)?;
        positions.push(from + offset);
        from += offset + 1;
    }

    Some(positions)
}
