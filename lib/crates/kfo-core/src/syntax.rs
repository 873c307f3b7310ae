//! Text form of a fragment: the agent's `<name tag> key value </name>` syntax.
//!
//! Only the subset the compiler consumes and emits is supported: nested
//! directives, one parameter per line, and full-line `#` comments.

use std::fmt::Write as _;

use crate::directive::{Directive, Fragment};
use crate::error::ParseError;

const INDENT: &str = "  ";

/// Parses configuration text into a fragment.
pub fn parse(text: &str) -> Result<Fragment, ParseError> {
    let mut top: Fragment = Vec::new();
    // Open directives, innermost last, with the line that opened them.
    let mut stack: Vec<(Directive, usize)> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("</") {
            let name = rest
                .strip_suffix('>')
                .map(str::trim)
                .filter(|n| is_directive_name(n))
                .ok_or_else(|| ParseError::MalformedTag {
                    line,
                    text: trimmed.to_string(),
                })?;

            let (dir, _) = stack.pop().ok_or_else(|| ParseError::UnexpectedClose {
                line,
                name: name.to_string(),
            })?;
            if dir.name != name {
                return Err(ParseError::MismatchedClose {
                    line,
                    expected: dir.name,
                    found: name.to_string(),
                });
            }
            match stack.last_mut() {
                Some((parent, _)) => parent.nested.push(dir),
                None => top.push(dir),
            }
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('<') {
            let inner = rest
                .strip_suffix('>')
                .map(str::trim)
                .ok_or_else(|| ParseError::MalformedTag {
                    line,
                    text: trimmed.to_string(),
                })?;
            let (name, tag) = split_first_word(inner);
            if !is_directive_name(name) {
                return Err(ParseError::MalformedTag {
                    line,
                    text: trimmed.to_string(),
                });
            }
            stack.push((Directive::new(name, tag), line));
            continue;
        }

        let (key, value) = split_first_word(trimmed);
        let Some((current, _)) = stack.last_mut() else {
            return Err(ParseError::ParamOutsideDirective {
                line,
                key: key.to_string(),
            });
        };
        if current.params.contains(key) {
            return Err(ParseError::DuplicateParam {
                line,
                key: key.to_string(),
            });
        }
        current.params.set(key, value);
    }

    if let Some((dir, line)) = stack.pop() {
        return Err(ParseError::Unterminated {
            line,
            name: dir.name,
        });
    }

    Ok(top)
}

/// Renders a fragment back to configuration text.
#[must_use]
pub fn render(fragment: &Fragment) -> String {
    let mut out = String::new();
    for (i, dir) in fragment.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_directive(&mut out, dir, 0);
    }
    out
}

fn render_directive(out: &mut String, dir: &Directive, depth: usize) {
    let pad = INDENT.repeat(depth);
    if dir.tag.is_empty() {
        let _ = writeln!(out, "{pad}<{}>", dir.name);
    } else {
        let _ = writeln!(out, "{pad}<{} {}>", dir.name, dir.tag);
    }

    for param in dir.params.iter() {
        if param.value.is_empty() {
            let _ = writeln!(out, "{pad}{INDENT}{}", param.name);
        } else {
            let _ = writeln!(out, "{pad}{INDENT}{} {}", param.name, param.value);
        }
    }

    for child in &dir.nested {
        render_directive(out, child, depth + 1);
    }

    let _ = writeln!(out, "{pad}</{}>", dir.name);
}

fn split_first_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (s, ""),
    }
}

fn is_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
