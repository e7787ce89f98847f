pub mod pipeline;
pub mod source;

pub use pipeline::{PipelineError, StatementPipeline};
pub use source::{ExtractError, JsonRunExtractor, MockExtractor, TextExtractor};
