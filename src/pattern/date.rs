//! Date sub-pattern rendering for `date('...')` and `now('...')` tokens.

use chrono::{Datelike, NaiveDate};

/// Render a date with a `yyyy`/`yy`/`MM`/`dd` sub-pattern.
///
/// Each token is substituted once. `yyyy` must be replaced before `yy`,
/// otherwise a bare `yy` replace would eat half of a four-digit year token.
/// Output is purely numeric and zero-padded; no locale involved.
pub fn render(date: NaiveDate, sub_pattern: &str) -> String {
    let full_year = format!("{:04}", date.year());
    let short_year = full_year[full_year.len() - 2..].to_string();
    let month = format!("{:02}", date.month());
    let day = format!("{:02}", date.day());

    sub_pattern
        .replacen("yyyy", &full_year, 1)
        .replacen("yy", &short_year, 1)
        .replacen("MM", &month, 1)
        .replacen("dd", &day, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn renders_year_month() {
        assert_eq!(render(date(2024, 3, 15), "yyyyMM"), "202403");
    }

    #[test]
    fn renders_full_date() {
        assert_eq!(render(date(2024, 3, 5), "yyyyMMdd"), "20240305");
    }

    #[test]
    fn short_year_is_last_two_digits() {
        assert_eq!(render(date(2024, 3, 15), "yyMM"), "2403");
        assert_eq!(render(date(2009, 1, 2), "yy"), "09");
    }

    #[test]
    fn full_year_not_eaten_by_short_year() {
        // yyyy must be substituted before yy; "2024" contains no literal "yy"
        // afterwards, so a yyyy pattern never double-substitutes.
        assert_eq!(render(date(2024, 12, 31), "yyyy"), "2024");
    }

    #[test]
    fn single_digit_fields_are_zero_padded() {
        assert_eq!(render(date(2024, 1, 9), "yyyyMMdd"), "20240109");
    }

    #[test]
    fn unknown_text_passes_through() {
        assert_eq!(render(date(2024, 3, 15), "yyyy/MM"), "2024/03");
    }
}
