//! String splitting for the `Split` component.

use std::{fmt, ops::Range, sync::Arc};

use regex::Regex;

use crate::Error;

/// What a string is split on.
#[derive(Clone)]
pub enum Separator {
    /// Every occurrence of a literal string.
    Literal(String),
    /// Every non-empty match of a regular expression.
    Pattern(Regex),
    /// Every single character matching the predicate.
    Chars(Arc<dyn Fn(char) -> bool + Send + Sync>),
    /// Every maximal run of characters matching the predicate.
    Runs(Arc<dyn Fn(char) -> bool + Send + Sync>),
}

impl Separator {
    /// Compiles `pattern` into a separator.
    pub fn pattern(pattern: &str) -> Result<Self, Error> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    pub fn chars(predicate: impl Fn(char) -> bool + Send + Sync + 'static) -> Self {
        Self::Chars(Arc::new(predicate))
    }

    pub fn runs(predicate: impl Fn(char) -> bool + Send + Sync + 'static) -> Self {
        Self::Runs(Arc::new(predicate))
    }

    /// Byte ranges of every separator occurrence in `input`, in order.
    fn occurrences(&self, input: &str) -> Vec<Range<usize>> {
        match self {
            Self::Literal(literal) => input
                .match_indices(literal.as_str())
                .map(|(start, found)| start..start + found.len())
                .collect(),
            Self::Pattern(regex) => regex
                .find_iter(input)
                .filter(|found| !found.is_empty())
                .map(|found| found.range())
                .collect(),
            Self::Chars(predicate) => input
                .char_indices()
                .filter(|(_, c)| predicate(*c))
                .map(|(start, c)| start..start + c.len_utf8())
                .collect(),
            Self::Runs(predicate) => {
                let mut runs: Vec<Range<usize>> = Vec::new();
                for (start, c) in input.char_indices().filter(|(_, c)| predicate(*c)) {
                    let end = start + c.len_utf8();
                    match runs.last_mut() {
                        Some(run) if run.end == start => run.end = end,
                        _ => runs.push(start..end),
                    }
                }
                runs
            }
        }
    }
}

impl fmt::Debug for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => f.debug_tuple("Literal").field(literal).finish(),
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Self::Chars(_) => f.write_str("Chars(..)"),
            Self::Runs(_) => f.write_str("Runs(..)"),
        }
    }
}

impl From<&str> for Separator {
    fn from(literal: &str) -> Self {
        Self::Literal(literal.to_string())
    }
}

impl From<String> for Separator {
    fn from(literal: String) -> Self {
        Self::Literal(literal)
    }
}

impl From<Regex> for Separator {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

impl From<char> for Separator {
    fn from(literal: char) -> Self {
        Self::Literal(literal.to_string())
    }
}

/// Splits `input` into the parts that get rendered.
///
/// An absent or empty input has no parts.  With `keep_separator` every
/// separator occurrence becomes a part of its own, interleaved with the text
/// around it, and zero-length parts are dropped; otherwise separators are
/// discarded and empty parts between adjacent separators are kept.  An empty
/// literal separator splits the input into its characters.
pub fn split(input: Option<&str>, separator: &Separator, keep_separator: bool) -> Vec<String> {
    let input = match input {
        Some(input) if !input.is_empty() => input,
        _ => return Vec::new(),
    };

    if matches!(separator, Separator::Literal(literal) if literal.is_empty()) {
        return input.chars().map(String::from).collect();
    }

    let mut parts = Vec::new();
    let mut cursor = 0;
    for occurrence in separator.occurrences(input) {
        let text = &input[cursor..occurrence.start];
        if !keep_separator {
            parts.push(text.to_string());
        } else {
            if !text.is_empty() {
                parts.push(text.to_string());
            }
            parts.push(input[occurrence.clone()].to_string());
        }
        cursor = occurrence.end;
    }
    let rest = &input[cursor..];
    if !keep_separator || !rest.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}
