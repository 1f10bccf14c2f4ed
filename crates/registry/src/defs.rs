//! Lightweight textual scans over definition strings.
//!
//! The full grammar belongs to the scripting runtime; these helpers only
//! extract what the entity records need: the head name, the argument count,
//! and the two components of a domain definition.

use crate::domain::DomainKind;

/// Text before the first `(`, trimmed; the whole trimmed string when no
/// parenthesis is present.
#[must_use]
pub fn base_name(def: &str) -> &str {
    match def.find('(') {
        Some(open) => def[..open].trim(),
        None => def.trim(),
    }
}

/// Number of arguments in the head of a definition.
///
/// Counts commas at nesting depth 1 between the first `(` and its matching
/// `)`. Zero commas means one argument when the enclosed text is non-blank
/// and zero when it is blank. No parenthesis, or an unmatched one, means
/// zero arguments.
#[must_use]
pub fn argument_count(def: &str) -> usize {
    let Some(open) = def.find('(') else {
        return 0;
    };
    let mut depth = 0usize;
    let mut commas = 0usize;
    let mut blank = true;
    for ch in def[open..].chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return if commas > 0 {
                        commas + 1
                    } else if blank {
                        0
                    } else {
                        1
                    };
                }
                blank = false;
            }
            ',' if depth == 1 => commas += 1,
            ch => {
                if depth >= 1 && !ch.is_whitespace() {
                    blank = false;
                }
            }
        }
    }
    0
}

/// Head of a definition up to the matching `)` of its first `(`, trimmed;
/// falls back to the base name when there is no argument list.
#[must_use]
pub fn signature(def: &str) -> String {
    if let Some(open) = def.find('(') {
        let mut depth = 0usize;
        for (offset, ch) in def[open..].char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return def[..open + offset + 1].trim().to_string();
                    }
                }
                _ => {}
            }
        }
    }
    base_name(def).to_string()
}

/// Split `Name = First x Second` / `Name = First + Second` at the first
/// top-level separator. `x` only separates as a standalone token.
#[must_use]
pub fn split_domain_def(def: &str) -> Option<(String, DomainKind, String, String)> {
    let (name, body) = def.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let chars: Vec<(usize, char)> = body.char_indices().collect();
    let mut depth = 0usize;
    for (i, &(pos, ch)) in chars.iter().enumerate() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '+' if depth == 0 => {
                return components(name, DomainKind::Sum, &body[..pos], &body[pos + 1..]);
            }
            'x' | 'X' if depth == 0 => {
                let standalone = (i == 0 || !is_name_char(chars[i - 1].1))
                    && (i + 1 == chars.len() || !is_name_char(chars[i + 1].1));
                if standalone {
                    return components(name, DomainKind::Product, &body[..pos], &body[pos + 1..]);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn components(
    name: &str,
    kind: DomainKind,
    first: &str,
    second: &str,
) -> Option<(String, DomainKind, String, String)> {
    let first = first.trim();
    let second = second.trim();
    if first.is_empty() || second.is_empty() {
        return None;
    }
    Some((
        name.to_string(),
        kind,
        first.to_string(),
        second.to_string(),
    ))
}
