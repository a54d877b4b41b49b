//! Typed representation of a parsed code pattern.
//!
//! A stored config is a format string (`"{A}-{B}-{C}"`) plus a map of
//! placeholder spec strings. Parsing turns that pair into an ordered list of
//! segments, so rendering never re-scans the raw strings and every token kind
//! is handled exhaustively.

use crate::errors::AppError;

/// One parsed placeholder spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    /// Plain text substituted verbatim.
    Literal(String),
    /// A date segment rendered with a `yyyy`/`yy`/`MM`/`dd` sub-pattern.
    ///
    /// `use_issue_date` distinguishes `date('...')` (caller-supplied issue
    /// date) from `now('...')` (wall-clock date at render time).
    Date {
        sub_pattern: String,
        use_issue_date: bool,
    },
    /// The sequential running-number segment.
    Running { width: u32, pad: char },
    /// Uniform random draws from a fixed charset.
    Random { width: u32, charset: Vec<char> },
}

/// One piece of the format string, in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text between placeholders.
    Text(String),
    /// A `{key}` reference resolved to its parsed token.
    Placeholder { key: String, token: PatternToken },
}

/// A fully parsed pattern, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPattern {
    pub segments: Vec<Segment>,
}

impl ParsedPattern {
    /// The `(width, pad)` of the pattern's single running placeholder.
    ///
    /// Generation requires exactly one: zero means there is nothing to
    /// sequence, more than one makes the running scope ambiguous. Both are
    /// configuration defects.
    pub fn running(&self) -> Result<(u32, char), AppError> {
        let mut found = None;
        for segment in &self.segments {
            if let Segment::Placeholder {
                token: PatternToken::Running { width, pad },
                ..
            } = segment
            {
                if found.is_some() {
                    return Err(AppError::InvalidPattern(
                        "pattern has more than one running() placeholder".to_string(),
                    ));
                }
                found = Some((*width, *pad));
            }
        }
        found.ok_or_else(|| {
            AppError::InvalidPattern("pattern has no running() placeholder".to_string())
        })
    }
}
