//! Final code rendering and period-prefix derivation.

use chrono::NaiveDate;
use rand::Rng;

use crate::errors::AppError;
use crate::pattern::date;
use crate::pattern::token::{ParsedPattern, PatternToken, Segment};

/// Render the final code for one generation call.
///
/// `last_no` is the running number previously issued for the period; the
/// running segment renders its successor `last_no + 1`. Date segments use
/// `issue_date` or `today` per their `use_issue_date` flag. Random segments
/// are drawn here exactly once per call and never re-derived, so the
/// returned string is the code that gets persisted.
pub fn render_code(
    pattern: &ParsedPattern,
    issue_date: NaiveDate,
    today: NaiveDate,
    last_no: i64,
) -> Result<String, AppError> {
    let mut out = String::new();

    for segment in &pattern.segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder { token, .. } => match token {
                PatternToken::Literal(text) => out.push_str(text),
                PatternToken::Date {
                    sub_pattern,
                    use_issue_date,
                } => {
                    let d = if *use_issue_date { issue_date } else { today };
                    out.push_str(&date::render(d, sub_pattern));
                }
                PatternToken::Running { width, pad } => {
                    out.push_str(&render_running(last_no, *width, *pad)?);
                }
                PatternToken::Random { width, charset } => {
                    let mut rng = rand::rng();
                    for _ in 0..*width {
                        out.push(charset[rng.random_range(0..charset.len())]);
                    }
                }
            },
        }
    }

    Ok(out)
}

/// Render the non-running, non-random portion of the pattern.
///
/// Two documents share a running-number scope iff they share this prefix;
/// the date segment's granularity (e.g. `yyyyMM`) is what rolls the period
/// over.
pub fn period_prefix(pattern: &ParsedPattern, issue_date: NaiveDate, today: NaiveDate) -> String {
    let mut out = String::new();

    for segment in &pattern.segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder { token, .. } => match token {
                PatternToken::Literal(text) => out.push_str(text),
                PatternToken::Date {
                    sub_pattern,
                    use_issue_date,
                } => {
                    let d = if *use_issue_date { issue_date } else { today };
                    out.push_str(&date::render(d, sub_pattern));
                }
                PatternToken::Running { .. } | PatternToken::Random { .. } => {}
            },
        }
    }

    out
}

/// Whether a running number fits in `width` digits.
pub fn fits_width(no: i64, width: u32) -> bool {
    no > 0 && no.to_string().len() <= width as usize
}

fn render_running(last_no: i64, width: u32, pad: char) -> Result<String, AppError> {
    let no = last_no + 1;
    if !fits_width(no, width) {
        return Err(AppError::SequenceOverflow { no, width });
    }

    let digits = no.to_string();
    let mut out = String::with_capacity(width as usize);
    for _ in digits.len()..width as usize {
        out.push(pad);
    }
    out.push_str(&digits);
    Ok(out)
}
