//! Pattern config parsing: spec strings + format string into a [`ParsedPattern`].
//!
//! Fails fast on malformed specs. A bad pattern is a configuration defect,
//! not a runtime error, so nothing here is retried.

use std::collections::BTreeMap;

use regex::Regex;

use crate::errors::AppError;
use crate::pattern::token::{ParsedPattern, PatternToken, Segment};

/// Parse a config's format string and placeholder map.
///
/// The format is segmented at `{key}` references; each referenced key must
/// have a placeholder entry. Entries the format never references are ignored.
/// Parsing is deterministic: the same config always yields a structurally
/// equal pattern.
pub fn parse(
    format: &str,
    placeholders: &BTreeMap<String, String>,
) -> Result<ParsedPattern, AppError> {
    if format.is_empty() {
        return Err(AppError::InvalidPattern(
            "format string is empty".to_string(),
        ));
    }

    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '{' {
            text.push(c);
            continue;
        }

        let mut key = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(k) => key.push(k),
                None => {
                    return Err(AppError::InvalidPattern(format!(
                        "unterminated placeholder '{{{key}' in format '{format}'"
                    )))
                }
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut text)));
        }

        let spec = placeholders.get(&key).ok_or_else(|| {
            AppError::InvalidPattern(format!(
                "format references undefined placeholder '{key}'"
            ))
        })?;
        segments.push(Segment::Placeholder {
            token: parse_spec(spec)?,
            key,
        });
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    Ok(ParsedPattern { segments })
}

/// Parse a single placeholder spec string into its token.
fn parse_spec(spec: &str) -> Result<PatternToken, AppError> {
    if spec.contains("now(") {
        Ok(PatternToken::Date {
            sub_pattern: extract_sub_pattern(spec)?,
            use_issue_date: false,
        })
    } else if spec.contains("date(") {
        Ok(PatternToken::Date {
            sub_pattern: extract_sub_pattern(spec)?,
            use_issue_date: true,
        })
    } else if spec.contains("running(") {
        parse_running(spec)
    } else if spec.contains("random(") {
        parse_random(spec)
    } else {
        Ok(PatternToken::Literal(spec.to_string()))
    }
}

/// Extract the quoted sub-pattern between `('` and `')`.
fn extract_sub_pattern(spec: &str) -> Result<String, AppError> {
    let re = Regex::new(r#"\(['"]([^'"]+)['"]\)"#).expect("valid regex");
    let captures = re.captures(spec).ok_or_else(|| {
        AppError::InvalidPattern(format!("malformed date spec '{spec}'"))
    })?;
    Ok(captures[1].to_string())
}

/// Parse `running(N,'c')`: positive width, single pad character.
fn parse_running(spec: &str) -> Result<PatternToken, AppError> {
    let re = Regex::new(r"running\(\s*(\d+)\s*,\s*'(.)'\s*\)").expect("valid regex");
    let captures = re.captures(spec).ok_or_else(|| {
        AppError::InvalidPattern(format!("malformed running spec '{spec}'"))
    })?;

    let width = parse_width(&captures[1], spec)?;
    let pad = captures[2]
        .chars()
        .next()
        .ok_or_else(|| AppError::InvalidPattern(format!("malformed running spec '{spec}'")))?;

    Ok(PatternToken::Running { width, pad })
}

/// Parse `random(N,['a','b',...])`: positive width, non-empty charset.
///
/// Charset elements are quoted single characters; an `'a'-'z'` element is an
/// inclusive range expanded at parse time.
fn parse_random(spec: &str) -> Result<PatternToken, AppError> {
    let re = Regex::new(r"random\(\s*(\d+)\s*,\s*\[(.*)\]\s*\)").expect("valid regex");
    let captures = re.captures(spec).ok_or_else(|| {
        AppError::InvalidPattern(format!("malformed random spec '{spec}'"))
    })?;

    let width = parse_width(&captures[1], spec)?;
    let charset = parse_charset(&captures[2], spec)?;

    Ok(PatternToken::Random { width, charset })
}

fn parse_width(digits: &str, spec: &str) -> Result<u32, AppError> {
    let width: u32 = digits.parse().map_err(|_| {
        AppError::InvalidPattern(format!("invalid width in spec '{spec}'"))
    })?;
    // Running numbers are i64; 18 digits always fit.
    if width == 0 || width > 18 {
        return Err(AppError::InvalidPattern(format!(
            "width must be between 1 and 18 in spec '{spec}'"
        )));
    }
    Ok(width)
}

fn parse_charset(inner: &str, spec: &str) -> Result<Vec<char>, AppError> {
    let re = Regex::new(r"'(.)'(?:\s*-\s*'(.)')?").expect("valid regex");
    let mut charset = Vec::new();

    for captures in re.captures_iter(inner) {
        let start = captures[1].chars().next().ok_or_else(|| {
            AppError::InvalidPattern(format!("malformed charset in spec '{spec}'"))
        })?;
        match captures.get(2).and_then(|m| m.as_str().chars().next()) {
            Some(end) => {
                if end < start {
                    return Err(AppError::InvalidPattern(format!(
                        "empty charset range '{start}'-'{end}' in spec '{spec}'"
                    )));
                }
                charset.extend(start..=end);
            }
            None => charset.push(start),
        }
    }

    if charset.is_empty() {
        return Err(AppError::InvalidPattern(format!(
            "empty charset in spec '{spec}'"
        )));
    }
    Ok(charset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_full_config() {
        let map = placeholders(&[
            ("P", "PR"),
            ("D", "date('yyyyMM')"),
            ("R", "running(5,'0')"),
        ]);
        let pattern = parse("{P}-{D}-{R}", &map).unwrap();

        assert_eq!(pattern.segments.len(), 5);
        assert_eq!(
            pattern.segments[0],
            Segment::Placeholder {
                key: "P".to_string(),
                token: PatternToken::Literal("PR".to_string()),
            }
        );
        assert_eq!(pattern.segments[1], Segment::Text("-".to_string()));
        assert_eq!(
            pattern.segments[2],
            Segment::Placeholder {
                key: "D".to_string(),
                token: PatternToken::Date {
                    sub_pattern: "yyyyMM".to_string(),
                    use_issue_date: true,
                },
            }
        );
        assert_eq!(
            pattern.segments[4],
            Segment::Placeholder {
                key: "R".to_string(),
                token: PatternToken::Running { width: 5, pad: '0' },
            }
        );
    }

    #[test]
    fn parse_is_idempotent() {
        let map = placeholders(&[
            ("A", "GRN"),
            ("B", "now('yyMMdd')"),
            ("C", "running(4,'0')"),
        ]);
        let first = parse("{A}{B}{C}", &map).unwrap();
        let second = parse("{A}{B}{C}", &map).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn now_spec_uses_wall_clock() {
        let map = placeholders(&[("N", "now('yyyy')")]);
        let pattern = parse("{N}", &map).unwrap();
        assert_eq!(
            pattern.segments[0],
            Segment::Placeholder {
                key: "N".to_string(),
                token: PatternToken::Date {
                    sub_pattern: "yyyy".to_string(),
                    use_issue_date: false,
                },
            }
        );
    }

    #[test]
    fn running_spec_tolerates_spaces() {
        // Stored configs in the wild contain `running(5, '0')`.
        let map = placeholders(&[("R", "running(5, '0')")]);
        let pattern = parse("{R}", &map).unwrap();
        assert_eq!(pattern.running().unwrap(), (5, '0'));
    }

    #[test]
    fn random_charset_list() {
        let map = placeholders(&[("X", "random(3,['A','B','C'])")]);
        let pattern = parse("{X}", &map).unwrap();
        assert_eq!(
            pattern.segments[0],
            Segment::Placeholder {
                key: "X".to_string(),
                token: PatternToken::Random {
                    width: 3,
                    charset: vec!['A', 'B', 'C'],
                },
            }
        );
    }

    #[test]
    fn random_charset_range_expands() {
        let map = placeholders(&[("X", "random(4,['A'-'E'])")]);
        let pattern = parse("{X}", &map).unwrap();
        match &pattern.segments[0] {
            Segment::Placeholder {
                token: PatternToken::Random { charset, .. },
                ..
            } => assert_eq!(charset, &vec!['A', 'B', 'C', 'D', 'E']),
            other => panic!("unexpected segment: {other:?}"),
        }
    }

    #[test]
    fn plain_spec_is_literal() {
        let map = placeholders(&[("L", "INV")]);
        let pattern = parse("{L}", &map).unwrap();
        assert_eq!(
            pattern.segments[0],
            Segment::Placeholder {
                key: "L".to_string(),
                token: PatternToken::Literal("INV".to_string()),
            }
        );
    }

    #[test]
    fn undefined_placeholder_rejected() {
        let map = placeholders(&[("A", "PR")]);
        let err = parse("{A}-{B}", &map).unwrap_err();
        assert!(matches!(err, AppError::InvalidPattern(_)));
        assert!(err.to_string().contains("'B'"));
    }

    #[test]
    fn unreferenced_placeholder_ignored() {
        let map = placeholders(&[("A", "PR"), ("Z", "running(4,'0')")]);
        let pattern = parse("{A}", &map).unwrap();
        assert_eq!(pattern.segments.len(), 1);
    }

    #[test]
    fn malformed_running_rejected() {
        for spec in ["running()", "running(x,'0')", "running(4,00)", "running(4)"] {
            let map = placeholders(&[("R", spec)]);
            assert!(
                matches!(parse("{R}", &map), Err(AppError::InvalidPattern(_))),
                "spec {spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn zero_width_rejected() {
        let map = placeholders(&[("R", "running(0,'0')")]);
        assert!(matches!(
            parse("{R}", &map),
            Err(AppError::InvalidPattern(_))
        ));
    }

    #[test]
    fn empty_random_charset_rejected() {
        let map = placeholders(&[("X", "random(4,[])")]);
        assert!(matches!(
            parse("{X}", &map),
            Err(AppError::InvalidPattern(_))
        ));
    }

    #[test]
    fn inverted_charset_range_rejected() {
        let map = placeholders(&[("X", "random(4,['Z'-'A'])")]);
        assert!(matches!(
            parse("{X}", &map),
            Err(AppError::InvalidPattern(_))
        ));
    }

    #[test]
    fn unterminated_placeholder_rejected() {
        let map = placeholders(&[("A", "PR")]);
        assert!(matches!(
            parse("{A", &map),
            Err(AppError::InvalidPattern(_))
        ));
    }

    #[test]
    fn empty_format_rejected() {
        let map = placeholders(&[]);
        assert!(matches!(parse("", &map), Err(AppError::InvalidPattern(_))));
    }
}
