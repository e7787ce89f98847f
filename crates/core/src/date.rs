use chrono::NaiveDate;

/// Layouts seen in the valuation-date column of consolidated statements.
const STATEMENT_DATE_FORMATS: &[&str] = &[
    "%d-%b-%Y", "%d-%B-%Y", "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d %b %Y", "%b %d, %Y",
];

/// Parse a valuation date in any of the layouts statements use.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    STATEMENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a strict `DD-MM-YYYY` date.
pub fn parse_day_month_year(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d-%m-%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn abbreviated_month() {
        assert_eq!(parse_statement_date("01-Jan-2024"), Some(date(2024, 1, 1)));
        assert_eq!(parse_statement_date("15-MAR-2023"), Some(date(2023, 3, 15)));
    }

    #[test]
    fn iso_and_numeric() {
        assert_eq!(parse_statement_date("2024-02-29"), Some(date(2024, 2, 29)));
        assert_eq!(parse_statement_date("31-03-2024"), Some(date(2024, 3, 31)));
        assert_eq!(parse_statement_date("31/03/2024"), Some(date(2024, 3, 31)));
    }

    #[test]
    fn unparseable_is_none() {
        assert_eq!(parse_statement_date("INF1A2B3C4D"), None);
        assert_eq!(parse_statement_date(""), None);
        assert_eq!(parse_statement_date("30-Feb-2024"), None);
    }

    #[test]
    fn day_month_year_is_strict() {
        assert_eq!(parse_day_month_year("05-04-2024"), Some(date(2024, 4, 5)));
        assert_eq!(parse_day_month_year("2024-04-05"), None);
    }
}
