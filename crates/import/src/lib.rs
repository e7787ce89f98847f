pub mod brokerage;
pub mod classifier;
pub mod columns;
pub mod consolidated;
pub mod error;
pub mod export;
pub mod profile;
pub mod reconcile;

pub use brokerage::{BrokerageDraft, BrokerageGrammar, BrokerageScan, BrokerageStatement};
pub use classifier::{LineClass, LineClassifier};
pub use columns::{Column, ColumnLayout, ColumnSpec, FieldRole};
pub use consolidated::{
    ConsolidatedGrammar, ConsolidatedScan, ConsolidatedStatement, HoldingDraft, PortfolioSummary,
};
pub use error::ImportError;
pub use export::ExportError;
pub use profile::{BrokerageProfile, ConsolidatedProfile, ProfileError};
pub use reconcile::{reconcile, Reconciliation};

pub mod import {
    use crate::*;

    pub fn parse_consolidated(text: &str) -> Result<ConsolidatedStatement, ImportError> {
        ConsolidatedGrammar::default().parse(text)
    }

    pub fn parse_brokerage(text: &str) -> Result<BrokerageStatement, ImportError> {
        BrokerageGrammar::default().parse(text)
    }

    pub fn consolidated_from_profile(toml_content: &str) -> Result<ConsolidatedGrammar, ProfileError> {
        ConsolidatedProfile::from_toml(toml_content)?.compile()
    }

    pub fn brokerage_from_profile(toml_content: &str) -> Result<BrokerageGrammar, ProfileError> {
        BrokerageProfile::from_toml(toml_content)?.compile()
    }
}
