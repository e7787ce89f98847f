use std::sync::OnceLock;

use regex::Regex;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

/// 8-digit or 11–12-digit folio number.
pub const FOLIO_PATTERN: &str = r"\b(?:[1-9]\d{7}|[1-9]\d{10,11})\b";
/// Mutual-fund ISIN as printed on consolidated statements.
pub const FUND_ISIN_PATTERN: &str = r"INF[A-Z0-9]+";
/// Registrar build banner repeated on every page.
pub const VERSION_BANNER_PATTERN: &str = r"Version:(V\d+\.\d+)\s+(Live-\d+)";

/// Equity or fund ISIN at the start of a brokerage line.
pub const LISTED_ISIN_PATTERN: &str = r"^IN[EF]\d[A-Z0-9]+";
pub const HOLDING_DATE_PATTERN: &str = r"^\d{2}-\d{2}-\d{4}";
pub const TOTAL_PATTERN: &str = r"(?i)^total\s*([\d,]+\.?\d*)";
pub const HOLDINGS_HEADING_PATTERN: &str = r"(?i)holdings balance";

re!(re_folio, FOLIO_PATTERN);
re!(re_fund_isin, FUND_ISIN_PATTERN);
re!(re_version_banner, VERSION_BANNER_PATTERN);
re!(re_listed_isin, LISTED_ISIN_PATTERN);
re!(re_holding_date, HOLDING_DATE_PATTERN);
re!(re_total, TOTAL_PATTERN);
re!(re_holdings_heading, HOLDINGS_HEADING_PATTERN);
re!(re_amount_prefix, r"\d+(?:\.\d{2})?");

/// What a trimmed statement line means to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Boilerplate; contributes nothing to the draft.
    Ignored,
    /// Carries a primary key (folio number).
    Key,
    /// Carries a security identifier; the match is attached.
    Identifier(&'a str),
    Other,
}

/// Ignore-list and record-start detection for one statement grammar.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    ignored: Vec<Regex>,
    key: Option<Regex>,
    identifier: Regex,
}

impl LineClassifier {
    pub fn new(ignored: Vec<Regex>, key: Option<Regex>, identifier: Regex) -> Self {
        Self { ignored, key, identifier }
    }

    /// Classifier for consolidated account statements.
    pub fn consolidated() -> Self {
        Self::new(
            vec![re_version_banner().clone()],
            Some(re_folio().clone()),
            re_fund_isin().clone(),
        )
    }

    /// Classifier for brokerage holdings statements, which have no primary key.
    pub fn brokerage() -> Self {
        Self::new(Vec::new(), None, re_listed_isin().clone())
    }

    pub fn is_ignored(&self, line: &str) -> bool {
        self.ignored.iter().any(|re| re.is_match(line))
    }

    /// The security identifier on `line`, if any.
    pub fn identifier<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.identifier.find(line).map(|m| m.as_str())
    }

    /// Classify a trimmed line. A key match takes priority over an identifier match.
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        if self.is_ignored(line) {
            return LineClass::Ignored;
        }
        if self.key.as_ref().is_some_and(|re| re.is_match(line)) {
            return LineClass::Key;
        }
        match self.identifier(line) {
            Some(id) => LineClass::Identifier(id),
            None => LineClass::Other,
        }
    }
}

/// The leading integer-or-two-decimal amount inside `token`, ignoring anything after it.
pub(crate) fn amount_prefix(token: &str) -> Option<&str> {
    re_amount_prefix().find(token).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folio_line_is_key() {
        let c = LineClassifier::consolidated();
        assert_eq!(c.classify("12345678/001\t1,234.56"), LineClass::Key);
        assert_eq!(c.classify("12345678901 500.00"), LineClass::Key);
    }

    #[test]
    fn folio_needs_word_boundaries() {
        let c = LineClassifier::consolidated();
        // 9 and 10 digits are neither folio length.
        assert_eq!(c.classify("123456789 10.00"), LineClass::Other);
        assert_eq!(c.classify("1234567890 10.00"), LineClass::Other);
        // Leading zero is not a folio.
        assert_eq!(c.classify("01234567 10.00"), LineClass::Other);
    }

    #[test]
    fn isin_line_is_identifier() {
        let c = LineClassifier::consolidated();
        assert_eq!(
            c.classify("100 01-Jan-2024 10.50 INF1A2B3C4D 999.00"),
            LineClass::Identifier("INF1A2B3C4D")
        );
    }

    #[test]
    fn key_wins_over_identifier() {
        let c = LineClassifier::consolidated();
        assert_eq!(c.classify("12345678 INF1A2B3C4D"), LineClass::Key);
    }

    #[test]
    fn version_banner_is_ignored() {
        let c = LineClassifier::consolidated();
        assert_eq!(c.classify("Version:V1.2 Live-12345678 INF999"), LineClass::Ignored);
    }

    #[test]
    fn brokerage_identifier_is_anchored() {
        let c = LineClassifier::brokerage();
        assert_eq!(c.identifier("INE002A01018 RELIANCE"), Some("INE002A01018"));
        assert_eq!(c.identifier("INF109K01Z48 ICICI"), Some("INF109K01Z48"));
        assert_eq!(c.identifier("RELIANCE INE002A01018"), None);
        assert_eq!(c.identifier("INX002A01018"), None);
    }

    #[test]
    fn total_capture_is_case_insensitive() {
        let caps = re_total().captures("TOTAL   10,000.25").unwrap();
        assert_eq!(&caps[1], "10,000.25");
        let caps = re_total().captures("total10,000").unwrap();
        assert_eq!(&caps[1], "10,000");
        assert!(re_total().captures("Grand Total 5").is_none());
    }

    #[test]
    fn amount_prefix_keeps_two_decimals() {
        assert_eq!(amount_prefix("1234.56"), Some("1234.56"));
        assert_eq!(amount_prefix("1234.5"), Some("1234"));
        assert_eq!(amount_prefix("1234.567"), Some("1234.56"));
        assert_eq!(amount_prefix("99.00*"), Some("99.00"));
        assert_eq!(amount_prefix("--"), None);
    }

    #[test]
    fn heading_matches_any_case() {
        assert!(re_holdings_heading().is_match("HOLDINGS BALANCE as on 31-03-2024"));
        assert!(!re_holdings_heading().is_match("Holding summary"));
    }
}
