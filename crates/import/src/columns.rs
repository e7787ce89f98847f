use holdex_core::amount::parse_number;
use serde::{Deserialize, Serialize};

/// The meaning of a positional token on a statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Folio,
    MarketValue,
    Units,
    ValuationDate,
    Price,
    CostValue,
    Rate,
    Value,
}

/// Where a field sits among a line's whitespace-separated tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Zero-based position from the start.
    Index(usize),
    /// One-based position from the end (`1` is the last token).
    FromEnd(usize),
    /// The first token that parses as a number.
    FirstNumeric,
}

impl Column {
    pub fn resolve<'a>(self, tokens: &[&'a str]) -> Option<&'a str> {
        match self {
            Column::Index(i) => tokens.get(i).copied(),
            Column::FromEnd(n) => tokens
                .len()
                .checked_sub(n)
                .filter(|_| n > 0)
                .and_then(|i| tokens.get(i).copied()),
            Column::FirstNumeric => tokens.iter().copied().find(|t| parse_number(t).is_some()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub role: FieldRole,
    pub column: Column,
}

/// A declarative role-to-position table for one kind of statement line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnLayout(pub Vec<ColumnSpec>);

impl ColumnLayout {
    pub fn new(specs: &[(FieldRole, Column)]) -> Self {
        Self(specs.iter().map(|&(role, column)| ColumnSpec { role, column }).collect())
    }

    /// The token bound to `role`, if the role is mapped and the line has that token.
    pub fn field<'a>(&self, role: FieldRole, tokens: &[&'a str]) -> Option<&'a str> {
        self.0
            .iter()
            .find(|spec| spec.role == role)
            .and_then(|spec| spec.column.resolve(tokens))
    }

    pub fn has(&self, role: FieldRole) -> bool {
        self.0.iter().any(|spec| spec.role == role)
    }
}

/// Split a trimmed line into its whitespace-separated tokens.
pub fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}
