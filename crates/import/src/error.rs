use thiserror::Error;

/// The one failure a statement import reports to its caller.
///
/// A missing document and a document that yields no holdings are deliberately
/// indistinguishable to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportError {
    #[error("You seem to have uploaded an invalid file. Please try again.")]
    InvalidInput,
}
