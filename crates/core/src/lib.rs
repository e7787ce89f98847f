pub mod amount;
pub mod date;
pub mod holding;
pub mod text_run;

pub use holding::{BrokerageHolding, DraftState, Holding, HoldingsMap, Keyed};
pub use text_run::{ContentItem, Page, TextRun};
