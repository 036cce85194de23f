//! Body field lookup.
//!
//! Field paths are dotted keys with optional array indices:
//! `args.name`, `headers.X-Custom-Header`, `items[0].id`. A leading `$` or
//! `$.` is accepted so JSONPath-style paths keep working.
//!
//! There is no quoting: `.` and `[` always split the path, so a key that
//! contains either character cannot be addressed. Assert on the parent
//! object with `field_equals` instead.

use serde_json::Value;

/// Result of looking a path up in a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLookup<'a> {
    /// The path resolved to a value.
    Found(&'a Value),
    /// A segment of the path does not exist.
    Missing {
        /// The prefix of the path that did resolve, e.g. `args`.
        resolved: String,
        /// The segment that failed, e.g. `name` or `[3]`.
        segment: String,
    },
    /// The path itself is malformed.
    InvalidPath(String),
    /// The body was not JSON in the first place.
    NotJson,
}

impl FieldLookup<'_> {
    /// Returns the found value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Looks `path` up in `json`.
#[must_use]
pub fn lookup<'a>(json: &'a Value, path: &str) -> FieldLookup<'a> {
    let path = path.trim();
    let path = path.strip_prefix('$').unwrap_or(path);
    let path = path.strip_prefix('.').unwrap_or(path);

    let mut current = json;
    let mut resolved = String::new();

    for segment in split_path_segments(path) {
        let (name, index) = match parse_array_access(&segment) {
            Some((name, index)) => match index.parse::<usize>() {
                Ok(index) => (name, Some(index)),
                Err(_) => {
                    return FieldLookup::InvalidPath(format!("invalid array index '{index}'"));
                }
            },
            None if segment.contains('[') || segment.contains(']') => {
                return FieldLookup::InvalidPath(format!("unbalanced brackets in '{segment}'"));
            }
            None => (segment.as_str(), None),
        };

        if !name.is_empty() {
            match current.get(name) {
                Some(value) => current = value,
                None => {
                    return FieldLookup::Missing {
                        resolved,
                        segment: name.to_string(),
                    };
                }
            }
            push_segment(&mut resolved, name);
        }

        if let Some(index) = index {
            match current.get(index) {
                Some(value) => current = value,
                None => {
                    return FieldLookup::Missing {
                        resolved,
                        segment: format!("[{index}]"),
                    };
                }
            }
            resolved.push_str(&format!("[{index}]"));
        }
    }

    FieldLookup::Found(current)
}

fn push_segment(resolved: &mut String, name: &str) {
    if !resolved.is_empty() {
        resolved.push('.');
    }
    resolved.push_str(name);
}

/// Split a path into segments, respecting array brackets.
fn split_path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                in_bracket = true;
                current.push(ch);
            }
            ']' => {
                in_bracket = false;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Parse array access like "field[0]" into ("field", "0").
fn parse_array_access(segment: &str) -> Option<(&str, &str)> {
    let bracket_start = segment.find('[')?;
    if segment.ends_with(']') {
        Some((
            &segment[..bracket_start],
            &segment[bracket_start + 1..segment.len() - 1],
        ))
    } else {
        None
    }
}
