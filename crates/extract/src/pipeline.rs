use holdex_import::{
    BrokerageGrammar, BrokerageStatement, ConsolidatedGrammar, ConsolidatedStatement, ImportError,
};
use holdex_layout::{LayoutConfig, LayoutReconstructor};
use thiserror::Error;

use crate::source::{ExtractError, TextExtractor};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Text extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl PipelineError {
    /// Whether this is the single user-facing "invalid file" condition.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PipelineError::Import(ImportError::InvalidInput))
    }
}

/// Orchestrates: extract pages → reconstruct lines → parse with a statement grammar.
///
/// Every call runs its own scan, so one pipeline can serve many documents
/// concurrently.
pub struct StatementPipeline<E: TextExtractor> {
    extractor: E,
    layout: LayoutReconstructor,
    consolidated: ConsolidatedGrammar,
    brokerage: BrokerageGrammar,
}

impl<E: TextExtractor> StatementPipeline<E> {
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            layout: LayoutReconstructor::default(),
            consolidated: ConsolidatedGrammar::default(),
            brokerage: BrokerageGrammar::default(),
        }
    }

    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = LayoutReconstructor::new(config);
        self
    }

    pub fn with_consolidated_grammar(mut self, grammar: ConsolidatedGrammar) -> Self {
        self.consolidated = grammar;
        self
    }

    pub fn with_brokerage_grammar(mut self, grammar: BrokerageGrammar) -> Self {
        self.brokerage = grammar;
        self
    }

    /// Extract and reconstruct `data` into one newline-delimited line stream.
    pub fn text(&self, data: &[u8]) -> Result<String, PipelineError> {
        // 1. No document at all.
        if data.is_empty() {
            return Err(ImportError::InvalidInput.into());
        }

        // 2. Pull positioned runs out of the document.
        let pages = self.extractor.extract(data)?;
        tracing::debug!(pages = pages.len(), bytes = data.len(), "extracted document");

        // 3. Rebuild rows and cells, pages joined in order.
        Ok(self.layout.reconstruct_document(&pages))
    }

    pub fn process_consolidated(&self, data: &[u8]) -> Result<ConsolidatedStatement, PipelineError> {
        let text = self.text(data)?;
        Ok(self.consolidated.parse(&text)?)
    }

    pub fn process_brokerage(&self, data: &[u8]) -> Result<BrokerageStatement, PipelineError> {
        let text = self.text(data)?;
        Ok(self.brokerage.parse(&text)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
