//! String-level analysis of rendered conditions.
//!
//! Conditions live on Selection and Join nodes as their infix rendering, so
//! the rewrite rules pattern-match on strings: splitting at top-level AND,
//! scanning for `qualifier.column` references, and scoring restrictiveness.
//! Single-quoted literals are opaque to all of these scans.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Split a condition at top-level AND into its predicates, stripping
/// redundant outer parentheses recursively, so `(((A AND B) AND C) AND D)`
/// yields four predicates.
pub(crate) fn split_conjunction(condition: &str) -> Vec<String> {
    let trimmed = condition.trim();
    let stripped = strip_outer_parens(trimmed);
    let parts = split_top_level(stripped, "AND");
    if parts.len() == 1 {
        // No conjunction inside. An OR group keeps its parentheses so that
        // re-joining predicates with ` AND ` stays unambiguous.
        if split_top_level(stripped, "OR").len() > 1 && trimmed.starts_with('(') {
            return vec![trimmed.to_string()];
        }
        return vec![stripped.to_string()];
    }
    parts
        .iter()
        .flat_map(|part| split_conjunction(part))
        .collect()
}

/// Remove outer parentheses while they wrap the entire string.
pub(crate) fn strip_outer_parens(condition: &str) -> &str {
    let mut s = condition.trim();
    while s.starts_with('(') && s.ends_with(')') && wraps_entirely(s) {
        s = s[1..s.len() - 1].trim();
    }
    s
}

fn wraps_entirely(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => i = skip_string(bytes, i),
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 && i != bytes.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
        i += 1;
    }
    depth == 0
}

/// Split at top-level occurrences of a word operator (depth 0, outside
/// string literals, not part of an identifier).
pub(crate) fn split_top_level(s: &str, op: &str) -> Vec<String> {
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                i = skip_string(bytes, i);
            }
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {
                if depth == 0 && is_word_at(s, i, op) {
                    parts.push(s[start..i].trim().to_string());
                    i += op.len();
                    start = i;
                    continue;
                }
            }
        }
        i += 1;
    }
    parts.push(s[start..].trim().to_string());
    parts
}

fn skip_string(bytes: &[u8], open: usize) -> usize {
    let mut i = open + 1;
    while i < bytes.len() && bytes[i] != b'\'' {
        i += 1;
    }
    i
}

fn is_word_at(s: &str, i: usize, word: &str) -> bool {
    let bytes = s.as_bytes();
    if i + word.len() > bytes.len() || !s[i..i + word.len()].eq_ignore_ascii_case(word) {
        return false;
    }
    let before_ok = i == 0 || !is_ident_byte(bytes[i - 1]);
    let after = i + word.len();
    let after_ok = after == bytes.len() || !is_ident_byte(bytes[after]);
    before_ok && after_ok
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `qualifier.column` tokens referenced by a condition, in order of
/// appearance.
pub(crate) fn qualified_refs(condition: &str) -> Vec<(String, String)> {
    static QUALIFIED: OnceLock<Regex> = OnceLock::new();
    let re = QUALIFIED.get_or_init(|| {
        Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)").unwrap()
    });

    re.captures_iter(condition)
        .map(|captures| (captures[1].to_string(), captures[2].to_string()))
        .collect()
}

/// Whether a qualifier names one of the given (lower-cased) relations.
///
/// Besides case-insensitive equality, a qualifier that is a prefix of the
/// relation name matches: the algebra no longer carries aliases, and aliases
/// are conventionally prefixes of the table name (`u` for `users`).
pub(crate) fn qualifier_matches(qualifier: &str, relations: &HashSet<String>) -> bool {
    let qualifier = qualifier.to_ascii_lowercase();
    relations
        .iter()
        .any(|relation| *relation == qualifier || relation.starts_with(&qualifier))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Attribute a predicate to one side of a binary operator, if its references
/// resolve cleanly: every qualifier must match exactly one, and the same,
/// side. Anything else (no references, both sides, unknown qualifiers) keeps
/// the predicate above the operator.
pub(crate) fn resolve_side(
    predicate: &str,
    left: &HashSet<String>,
    right: &HashSet<String>,
) -> Option<Side> {
    let mut side = None;
    let refs = qualified_refs(predicate);
    if refs.is_empty() {
        return None;
    }

    for (qualifier, _) in refs {
        let in_left = qualifier_matches(&qualifier, left);
        let in_right = qualifier_matches(&qualifier, right);

        let this = match (in_left, in_right) {
            (true, false) => Side::Left,
            (false, true) => Side::Right,
            _ => return None,
        };
        match side {
            None => side = Some(this),
            Some(s) if s == this => {}
            Some(_) => return None,
        }
    }
    side
}

/// Heuristic restrictiveness score; lower is more restrictive. Rewrites
/// place low-score predicates closest to the relation.
pub(crate) fn restrictiveness(predicate: &str) -> f64 {
    let predicate = strip_outer_parens(predicate);
    let mut score = 1.0;

    if predicate.contains('=') || predicate.contains("!=") || predicate.contains("<>") {
        score *= 0.1;
    }
    if predicate.contains('<') || predicate.contains('>') {
        score *= 0.3;
    }

    let ands = split_top_level(predicate, "AND").len() - 1;
    let ors = split_top_level(predicate, "OR").len() - 1;
    score *= 0.5_f64.powi(ands as i32);
    score *= 1.5_f64.powi(ors as i32);

    score
}
