use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::brokerage::{default_brokerage_columns, BrokerageGrammar};
use crate::classifier::{
    LineClassifier, FOLIO_PATTERN, FUND_ISIN_PATTERN, HOLDING_DATE_PATTERN, LISTED_ISIN_PATTERN,
    TOTAL_PATTERN, VERSION_BANNER_PATTERN,
};
use crate::columns::{ColumnLayout, FieldRole};
use crate::consolidated::{default_identifier_columns, default_key_columns, ConsolidatedGrammar};
use crate::reconcile::default_tolerance;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to parse profile: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid pattern {pattern:?}: {source}")]
    Regex { pattern: String, source: regex::Error },
    #[error("Pattern {0:?} has no capture group")]
    MissingCapture(String),
    #[error("Column layout has no {0:?} column")]
    MissingRole(FieldRole),
}

fn compile_pattern(pattern: &str) -> Result<Regex, ProfileError> {
    Regex::new(pattern).map_err(|source| ProfileError::Regex {
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_heading(pattern: &str) -> Result<Regex, ProfileError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ProfileError::Regex {
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, ProfileError> {
    patterns.iter().map(|p| compile_pattern(p)).collect()
}

fn require_roles(layout: &ColumnLayout, roles: &[FieldRole]) -> Result<(), ProfileError> {
    match roles.iter().find(|&&role| !layout.has(role)) {
        Some(&role) => Err(ProfileError::MissingRole(role)),
        None => Ok(()),
    }
}

/// Patterns and column layouts for a consolidated account statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidatedProfile {
    pub name: String,
    pub ignore_patterns: Vec<String>,
    pub key_pattern: String,
    pub identifier_pattern: String,
    pub key_columns: ColumnLayout,
    pub identifier_columns: ColumnLayout,
}

impl Default for ConsolidatedProfile {
    fn default() -> Self {
        Self {
            name: "consolidated".to_string(),
            ignore_patterns: vec![VERSION_BANNER_PATTERN.to_string()],
            key_pattern: FOLIO_PATTERN.to_string(),
            identifier_pattern: FUND_ISIN_PATTERN.to_string(),
            key_columns: default_key_columns(),
            identifier_columns: default_identifier_columns(),
        }
    }
}

impl ConsolidatedProfile {
    pub fn from_toml(toml_content: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn compile(&self) -> Result<ConsolidatedGrammar, ProfileError> {
        require_roles(&self.key_columns, &[FieldRole::Folio, FieldRole::MarketValue])?;
        let classifier = LineClassifier::new(
            compile_all(&self.ignore_patterns)?,
            Some(compile_pattern(&self.key_pattern)?),
            compile_pattern(&self.identifier_pattern)?,
        );
        Ok(ConsolidatedGrammar {
            classifier,
            key_columns: self.key_columns.clone(),
            identifier_columns: self.identifier_columns.clone(),
        })
    }
}

/// Patterns, column layout and tolerance for a brokerage holdings statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerageProfile {
    pub name: String,
    /// Matched case-insensitively; scanning starts at the first hit.
    pub headings: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub identifier_pattern: String,
    pub date_pattern: String,
    /// Capture group 1 holds the reported total.
    pub total_pattern: String,
    pub columns: ColumnLayout,
    pub tolerance: Decimal,
}

impl Default for BrokerageProfile {
    fn default() -> Self {
        Self {
            name: "brokerage".to_string(),
            headings: vec!["holdings balance".to_string()],
            ignore_patterns: Vec::new(),
            identifier_pattern: LISTED_ISIN_PATTERN.to_string(),
            date_pattern: HOLDING_DATE_PATTERN.to_string(),
            total_pattern: TOTAL_PATTERN.to_string(),
            columns: default_brokerage_columns(),
            tolerance: default_tolerance(),
        }
    }
}

impl BrokerageProfile {
    pub fn from_toml(toml_content: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn compile(&self) -> Result<BrokerageGrammar, ProfileError> {
        require_roles(&self.columns, &[FieldRole::Units, FieldRole::Rate, FieldRole::Value])?;
        let total = compile_pattern(&self.total_pattern)?;
        if total.captures_len() < 2 {
            return Err(ProfileError::MissingCapture(self.total_pattern.clone()));
        }
        Ok(BrokerageGrammar {
            classifier: LineClassifier::new(
                compile_all(&self.ignore_patterns)?,
                None,
                compile_pattern(&self.identifier_pattern)?,
            ),
            headings: self
                .headings
                .iter()
                .map(|h| compile_heading(h))
                .collect::<Result<_, _>>()?,
            date: compile_pattern(&self.date_pattern)?,
            total,
            columns: self.columns.clone(),
            tolerance: self.tolerance,
        })
    }
}
