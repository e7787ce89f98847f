use holdex_core::Page;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Document decode error: {0}")]
    Decode(String),
    #[error("Text extraction error: {0}")]
    Engine(String),
}

/// Abstraction over a document text extractor.
/// Implementations accept raw document bytes and return each page's positioned
/// text runs in extraction order, with accurate geometry and end-of-line flags.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, data: &[u8]) -> Result<Vec<Page>, ExtractError>;
}

// ── Mock extractor (used for tests) ──────────────────────────────────────────

/// Returns preset pages regardless of the document bytes.
pub struct MockExtractor {
    pages: Result<Vec<Page>, String>,
}

impl MockExtractor {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages: Ok(pages) }
    }

    /// An extractor whose engine always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { pages: Err(message.into()) }
    }
}

impl TextExtractor for MockExtractor {
    fn extract(&self, _data: &[u8]) -> Result<Vec<Page>, ExtractError> {
        self.pages.clone().map_err(ExtractError::Engine)
    }
}

// ── Run dump extractor ───────────────────────────────────────────────────────

/// Reads pages that an external PDF engine has already dumped as JSON:
/// an array of `{"items": [{"run": {..}}, "marker", ..]}` objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRunExtractor;

impl TextExtractor for JsonRunExtractor {
    fn extract(&self, data: &[u8]) -> Result<Vec<Page>, ExtractError> {
        serde_json::from_slice(data).map_err(|e| ExtractError::Decode(e.to_string()))
    }
}
